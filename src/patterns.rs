use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

use crate::config::Token;

/// One known way of embedding a cookie in a playlist
#[derive(Debug)]
pub struct PatternRule {
    pub label: &'static str,
    /// Detects and counts the format
    probe: Regex,
    /// Selects the regions to replace. An optional `lead` group is kept as-is.
    target: Regex,
    /// Builds the replacement fragment carrying the new token
    render: fn(&str) -> String,
}

impl PatternRule {
    fn new(label: &'static str, probe: &str, target: &str, render: fn(&str) -> String) -> Self {
        Self {
            label,
            probe: Regex::new(probe).unwrap(),
            target: Regex::new(target).unwrap(),
            render,
        }
    }

    fn symmetric(label: &'static str, pattern: &str, render: fn(&str) -> String) -> Self {
        Self::new(label, pattern, pattern, render)
    }

    #[must_use]
    pub fn is_present(&self, haystack: &str) -> bool {
        self.probe.is_match(haystack)
    }

    /// Replaces every match of this rule with a fragment carrying `token`.
    ///
    /// The token is inserted literally, never expanded as a replacement template.
    #[must_use]
    pub fn apply<'h>(&self, haystack: &'h str, token: &Token) -> Cow<'h, str> {
        let fragment = (self.render)(token.as_str());
        self.target.replace_all(haystack, |caps: &Captures| {
            let lead = caps.name("lead").map_or("", |m| m.as_str());
            format!("{lead}{fragment}")
        })
    }

    /// Counts occurrences and returns the first one, without its `lead`
    #[must_use]
    pub fn sightings<'h>(&self, haystack: &'h str) -> (usize, Option<&'h str>) {
        let mut first = None;
        let mut count = 0;
        for caps in self.probe.captures_iter(haystack) {
            if first.is_none() {
                first = caps.get(0).map(|whole| {
                    let lead = caps.name("lead").map_or(0, |m| m.len());
                    &whole.as_str()[lead..]
                });
            }
            count += 1;
        }
        (count, first)
    }
}

/// Every supported cookie format, in the order they are applied
pub static PATTERN_RULES: LazyLock<[PatternRule; 6]> = LazyLock::new(|| {
    // A bare `cookie=` must not fire inside `http-cookie=`, `|Cookie=` or `&cookie=`
    let query_param = r"(?i)(?P<lead>^|[^\w&|\-])cookie=[^&\s]+";

    [
        // The value never runs past the end of its line
        PatternRule::symmetric("Cookie: header", r"(?i)Cookie:[^\r\n]*", |token| {
            format!("Cookie: {token}")
        }),
        PatternRule::symmetric(
            "#EXTVLCOPT:http-cookie",
            r"(?i)#EXTVLCOPT:http-cookie=[^\r\n]*",
            |token| format!("#EXTVLCOPT:http-cookie={token}"),
        ),
        PatternRule::symmetric("cookie= parameter", query_param, |token| {
            format!("cookie={token}")
        }),
        PatternRule::new(
            "HLS SESSION-DATA",
            r#"(?i)#EXT-X-SESSION-DATA:DATA-ID="COOKIE"[^\r\n]*"#,
            r#"(?i)#EXT-X-SESSION-DATA:DATA-ID="COOKIE",VALUE="[^"]*""#,
            |token| format!(r#"#EXT-X-SESSION-DATA:DATA-ID="COOKIE",VALUE="{token}""#),
        ),
        PatternRule::symmetric("|Cookie= format", r"(?i)\|Cookie=[^|\r\n]*", |token| {
            format!("|Cookie={token}")
        }),
        PatternRule::symmetric("&cookie= format", r"(?i)&cookie=[^&\s]*", |token| {
            format!("&cookie={token}")
        }),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str) -> Token {
        Token::new(value).unwrap()
    }

    /// (rule label, input line, expected line with token `NEW`)
    const SINGLE_FORMAT_CASES: [(&str, &str, &str); 6] = [
        (
            "Cookie: header",
            "#EXTHTTP:Cookie: session=old",
            "#EXTHTTP:Cookie: NEW",
        ),
        (
            "#EXTVLCOPT:http-cookie",
            "#EXTVLCOPT:http-cookie=abc123",
            "#EXTVLCOPT:http-cookie=NEW",
        ),
        (
            "cookie= parameter",
            "http://example.com/live.m3u8?cookie=old&quality=hd",
            "http://example.com/live.m3u8?cookie=NEW&quality=hd",
        ),
        (
            "HLS SESSION-DATA",
            r#"#EXT-X-SESSION-DATA:DATA-ID="COOKIE",VALUE="old""#,
            r#"#EXT-X-SESSION-DATA:DATA-ID="COOKIE",VALUE="NEW""#,
        ),
        (
            "|Cookie= format",
            "http://example.com/live.ts|Cookie=old|User-Agent=vlc",
            "http://example.com/live.ts|Cookie=NEW|User-Agent=vlc",
        ),
        (
            "&cookie= format",
            "http://example.com/live.ts?id=1&cookie=old&x=2",
            "http://example.com/live.ts?id=1&cookie=NEW&x=2",
        ),
    ];

    #[test]
    fn each_format_is_matched_by_exactly_one_rule() {
        for (label, input, _) in SINGLE_FORMAT_CASES {
            let present: Vec<_> = PATTERN_RULES
                .iter()
                .filter(|rule| rule.is_present(input))
                .map(|rule| rule.label)
                .collect();
            assert_eq!(present, vec![label], "input: {input}");
        }
    }

    #[test]
    fn each_format_is_rewritten_with_syntax_intact() {
        let new = token("NEW");
        for (label, input, expected) in SINGLE_FORMAT_CASES {
            let rule = PATTERN_RULES.iter().find(|r| r.label == label).unwrap();
            assert_eq!(rule.apply(input, &new), expected, "rule: {label}");
        }
    }

    #[test]
    fn keywords_match_case_insensitively_and_token_case_is_kept() {
        let rule = &PATTERN_RULES[1];
        let out = rule.apply("#extvlcopt:HTTP-COOKIE=old", &token("MiXeD"));
        assert_eq!(out, "#EXTVLCOPT:http-cookie=MiXeD");
    }

    #[test]
    fn all_occurrences_of_a_format_are_replaced() {
        let rule = &PATTERN_RULES[5];
        let input = "a.ts?x=1&cookie=one\nb.ts?x=2&COOKIE=two\n";
        assert_eq!(
            rule.apply(input, &token("t")),
            "a.ts?x=1&cookie=t\nb.ts?x=2&cookie=t\n"
        );
    }

    #[test]
    fn empty_cookie_header_keeps_following_line() {
        let rule = &PATTERN_RULES[0];
        let input = "#EXTINF:-1,News\n#EXTHTTP:Cookie:\nhttp://example.com/news.m3u8\n";
        assert_eq!(
            rule.apply(input, &token("tok")),
            "#EXTINF:-1,News\n#EXTHTTP:Cookie: tok\nhttp://example.com/news.m3u8\n"
        );
    }

    #[test]
    fn vlc_option_accepts_empty_value() {
        let rule = &PATTERN_RULES[1];
        assert!(rule.is_present("#EXTVLCOPT:http-cookie=\n"));
        assert_eq!(
            rule.apply("#EXTVLCOPT:http-cookie=\n", &token("t")),
            "#EXTVLCOPT:http-cookie=t\n"
        );
    }

    #[test]
    fn query_parameter_keeps_leading_character() {
        let rule = &PATTERN_RULES[2];
        assert_eq!(
            rule.apply("cookie=a\nurl?cookie=b x;cookie=c", &token("t")),
            "cookie=t\nurl?cookie=t x;cookie=t"
        );
        assert!(!rule.is_present("mycookie=a"));
    }

    #[test]
    fn session_data_requires_cookie_data_id() {
        let rule = &PATTERN_RULES[3];
        let other = r#"#EXT-X-SESSION-DATA:DATA-ID="com.example.title",VALUE="old""#;
        assert!(!rule.is_present(other));
        assert_eq!(rule.apply(other, &token("t")), other);
    }

    #[test]
    fn token_is_not_expanded_as_replacement_template() {
        let rule = &PATTERN_RULES[0];
        assert_eq!(rule.apply("Cookie: old", &token("$0${lead}")), "Cookie: $0${lead}");
    }

    #[test]
    fn sightings_count_and_show_first_fragment() {
        let rule = &PATTERN_RULES[2];
        let (count, first) = rule.sightings("u?cookie=one\nv?cookie=two\n");
        assert_eq!(count, 2);
        assert_eq!(first, Some("cookie=one"));

        assert_eq!(rule.sightings("nothing here"), (0, None));
    }
}

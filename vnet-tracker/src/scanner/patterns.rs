//! Line classification for build-tool verification logs.
//!
//! The upstream log format is not stable, so nothing here fails: a pattern that does not match yields `None`.

use once_cell::sync::Lazy;
use regex::Regex;

/// A line consisting only of this token opens the section holding deployment output.
pub const SECTION_MARKER: &str = "##";

static ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(0x[0-9a-fA-F]+)`").expect("valid address pattern"));
static CHAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)deployed\s+on\s+(\d+)").expect("valid chain pattern"));
static CONTRACT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid contract id pattern"));
static BACKTICKED: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid backtick pattern"));

/// What a single log line announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLine<'a> {
    SectionMarker,
    StartVerifying(&'a str),
    CompilerVersion(&'a str),
    SubmittingVerification(&'a str),
    VerificationStatus,
    Optimizations(&'a str),
    Other,
}

impl<'a> LogLine<'a> {
    /// Each line is matched against the markers in a fixed order and announces at most one thing.
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed == SECTION_MARKER {
            return Self::SectionMarker;
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.contains("start verifying contract") {
            Self::StartVerifying(trimmed)
        } else if lower.contains("compiler version") {
            Self::CompilerVersion(trimmed)
        } else if lower.contains("submitting verification for") {
            Self::SubmittingVerification(trimmed)
        } else if lower.contains("contract verification status") {
            Self::VerificationStatus
        } else if lower.contains("optimizations") {
            Self::Optimizations(trimmed)
        } else {
            Self::Other
        }
    }
}

pub fn address(line: &str) -> Option<String> {
    ADDRESS.captures(line).map(|caps| caps[1].to_string())
}

pub fn chain_id(line: &str) -> Option<String> {
    CHAIN.captures(line).map(|caps| caps[1].to_string())
}

/// Text after the first colon.
pub fn compiler_version(line: &str) -> Option<String> {
    let (_, version) = line.split_once(':')?;
    let version = version.trim();
    (!version.is_empty()).then(|| version.to_string())
}

/// Trailing integer of the line.
pub fn optimizations(line: &str) -> Option<u64> {
    line.rsplit(|c: char| c.is_whitespace() || c == ':').find(|token| !token.is_empty())?.parse().ok()
}

/// `[path:Name]` split on the first colon.
pub fn contract_id(line: &str) -> Option<(String, Option<String>)> {
    let caps = CONTRACT_ID.captures(line)?;
    let id = caps[1].trim();
    match id.split_once(':') {
        Some((path, name)) => {
            let name = name.trim();
            Some((path.trim().to_string(), (!name.is_empty()).then(|| name.to_string())))
        }
        None => Some((id.to_string(), None)),
    }
}

/// Backtick-quoted token of a `Response:` line.
pub fn response_status(line: &str) -> Option<String> {
    if !line.to_ascii_lowercase().contains("response:") {
        return None;
    }
    BACKTICKED.captures(line).map(|caps| caps[1].trim().to_string()).filter(|status| !status.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("##", LogLine::SectionMarker)]
    #[case("   ##  ", LogLine::SectionMarker)]
    #[case("## Setting up 1 EVM.", LogLine::Other)]
    #[case("Start verifying contract `0x01` deployed on 1", LogLine::StartVerifying("Start verifying contract `0x01` deployed on 1"))]
    #[case("Compiler version: 0.8.23", LogLine::CompilerVersion("Compiler version: 0.8.23"))]
    #[case("Optimizations:    200", LogLine::Optimizations("Optimizations:    200"))]
    #[case("Contract verification status:", LogLine::VerificationStatus)]
    #[case("Response: `OK`", LogLine::Other)]
    #[case("Script ran successfully.", LogLine::Other)]
    fn classifies_lines(#[case] line: &str, #[case] expected: LogLine<'_>) {
        assert_eq!(LogLine::classify(line), expected);
    }

    #[test]
    fn submitting_wins_over_optimizations_in_path() {
        let line = "Submitting verification for [src/Optimizations.sol:Optimizations] 0x01.";
        assert_eq!(LogLine::classify(line), LogLine::SubmittingVerification(line));
    }

    #[rstest]
    #[case("Start verifying contract `0xABCDEF1234567890123456789012345678901234` deployed on 1", Some("0xABCDEF1234567890123456789012345678901234"), Some("1"))]
    #[case("Start verifying contract `0xabc` deployed on 73571", Some("0xabc"), Some("73571"))]
    #[case("Start verifying contract 0xabc deployed on sepolia", None, None)]
    #[case("Start verifying contract `0xabc` deployed on mainnet", Some("0xabc"), None)]
    fn extracts_start_fields(#[case] line: &str, #[case] address_: Option<&str>, #[case] chain: Option<&str>) {
        assert_eq!(address(line).as_deref(), address_);
        assert_eq!(chain_id(line).as_deref(), chain);
    }

    #[rstest]
    #[case("Compiler version: 0.8.23", Some("0.8.23"))]
    #[case("Compiler version:   v0.8.20+commit.a1b79de6  ", Some("v0.8.20+commit.a1b79de6"))]
    #[case("Compiler version:", None)]
    #[case("Compiler version unknown", None)]
    fn extracts_compiler(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(compiler_version(line).as_deref(), expected);
    }

    #[rstest]
    #[case("Optimizations:    200", Some(200))]
    #[case("Optimizations: 0", Some(0))]
    #[case("Optimizations:1000000", Some(1_000_000))]
    #[case("Optimizations: disabled", None)]
    #[case("Optimizations: -5", None)]
    #[case("Optimizations:", None)]
    fn extracts_optimizations(#[case] line: &str, #[case] expected: Option<u64>) {
        assert_eq!(optimizations(line), expected);
    }

    #[rstest]
    #[case("Submitting verification for [src/Counter.sol:Counter] 0x01.", Some(("src/Counter.sol", Some("Counter"))))]
    #[case("Submitting verification for [lib/a:b:c] 0x01.", Some(("lib/a", Some("b:c"))))]
    #[case("Submitting verification for [src/Counter.sol] 0x01.", Some(("src/Counter.sol", None)))]
    #[case("Submitting verification for 0x01", None)]
    fn extracts_contract_id(#[case] line: &str, #[case] expected: Option<(&str, Option<&str>)>) {
        let actual = contract_id(line);
        let actual = actual.as_ref().map(|(path, name)| (path.as_str(), name.as_deref()));
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case("Response: `OK`", Some("OK"))]
    #[case("  response: `NOTOK`", Some("NOTOK"))]
    #[case("Details: `Pass - Verified`", None)]
    #[case("Response: OK", None)]
    #[case("Response: ``", None)]
    fn extracts_status(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(response_status(line).as_deref(), expected);
    }
}

//! AWS CLI command execution.
//!
//! Runs `aws ... --output json` commands and parses their output.

use crate::config::MAX_CLI_OUTPUT_BYTES;
use colored::Colorize;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::process::Command;
use std::sync::OnceLock;

/// Regex for splitting command strings while preserving quoted substrings.
static COMMAND_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_command_regex() -> &'static Regex {
    COMMAND_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a shell command and return its stdout.
///
/// The command string is split on spaces, with quoted substrings preserved.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err` - If the command fails or its output exceeds [`MAX_CLI_OUTPUT_BYTES`]
pub fn run(cmd: &str) -> Result<String, Box<dyn Error>> {
    run_limited(cmd, MAX_CLI_OUTPUT_BYTES)
}

/// [`run`] with an explicit cap on the stdout size.
fn run_limited(cmd: &str, max_output_bytes: usize) -> Result<String, Box<dyn Error>> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let cmds: Vec<&str> = split_and_strip(cmd);
    log::trace!("split cmds={:?}", cmds);
    let program = cmds
        .first()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| format!("Empty command: '{cmd}'"))?;

    // Build command and add args
    let mut command = Command::new(program);
    for arg in cmds.iter().skip(1).filter(|a| !a.is_empty()) {
        command.arg(arg);
    }

    let output = command.output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute command '{program}': {e}")
    })?;

    if output.status.success() {
        log::debug!("Success cmd: {cmd}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());

        if output.stdout.len() > max_output_bytes {
            return Err(format!(
                "Response too large: {} bytes for command: {:?}",
                output.stdout.len(),
                cmds
            )
            .into());
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running: {}", stderr.trim()).into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;

    Ok(stdout)
}

/// Run a command and deserialize its JSON output.
pub fn run_json<T: DeserializeOwned>(cmd: &str) -> Result<T, Box<dyn Error>> {
    let output = run(cmd)?;
    parse_json(&output).map_err(|e| format!("{e} (command: {cmd})").into())
}

/// Deserialize CLI output, reporting the JSON path of any mismatch.
///
/// Some list commands print nothing at all when the account has no items.
pub fn parse_json<T: DeserializeOwned>(output: &str) -> Result<T, Box<dyn Error>> {
    let output = if output.trim().is_empty() { "{}" } else { output };
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::trace!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        format!("Error parsing JSON: path={} error={}", e.path(), e).into()
    })
}

/// Split a command string on spaces, preserving quoted substrings.
fn split_and_strip(input: &str) -> Vec<&str> {
    get_command_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_split_and_strip_complex() {
        let input = "aws ec2 describe-vpcs --region 'us-east-1'  --output json";
        let expected = vec![
            "aws",
            "ec2",
            "describe-vpcs",
            "--region",
            "us-east-1",
            "--output",
            "json",
        ];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_nospaces() {
        let input = "NoSpacesHere";
        let expected = vec!["NoSpacesHere"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_empty_quotes() {
        let input = "Empty '' Single Quotes";
        let expected = vec!["Empty", "", "Single", "Quotes"];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_split_and_strip_quoted_filter() {
        let input = "aws ec2 describe-subnets --filters \"Name=vpc-id,Values=vpc-1 vpc-2\"";
        let expected = vec![
            "aws",
            "ec2",
            "describe-subnets",
            "--filters",
            "Name=vpc-id,Values=vpc-1 vpc-2",
        ];
        assert_eq!(split_and_strip(input), expected);
    }

    #[test]
    fn test_run_empty_command_is_error() {
        assert!(run("").is_err());
    }

    #[test]
    fn test_run_rejects_oversized_output() {
        assert_eq!(run_limited("echo hi", 64).unwrap(), "hi\n");
        let err = run_limited("echo 'more than eight bytes'", 8).unwrap_err();
        assert!(err.to_string().starts_with("Response too large: 22 bytes"), "{err}");
    }

    #[derive(Deserialize, Debug, Default)]
    #[serde(rename_all = "PascalCase")]
    struct Queues {
        #[serde(default)]
        queue_urls: Vec<String>,
    }

    #[test]
    fn test_parse_json_empty_output() {
        let queues: Queues = parse_json("").unwrap();
        assert!(queues.queue_urls.is_empty());
    }

    #[test]
    fn test_parse_json_reports_path() {
        let err = parse_json::<Queues>(r#"{"QueueUrls": [1]}"#).unwrap_err();
        assert!(err.to_string().contains("QueueUrls[0]"), "{err}");
    }
}

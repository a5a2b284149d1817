//! Generation services available to the CLI.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use totsy_commerce::generation::GenerationService;
use totsy_commerce::GenerationError;

use crate::config::GenerationConfig;

/// Replays a completion saved to a file, ignoring the prompt.
pub struct FileCompletion {
    path: PathBuf,
}

impl FileCompletion {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GenerationService for FileCompletion {
    fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        std::fs::read_to_string(&self.path).map_err(|e| {
            GenerationError::Transport(format!("failed to read {}: {}", self.path.display(), e))
        })
    }
}

/// Pipes the prompt to an external command and reads the answer from its
/// stdout.
pub struct CommandCompletion {
    program: String,
    args: Vec<String>,
    api_key_env: Option<String>,
}

impl CommandCompletion {
    pub fn from_config(config: &GenerationConfig) -> Option<Self> {
        let program = config.command.as_ref()?.trim();
        if program.is_empty() {
            return None;
        }
        Some(Self {
            program: program.to_string(),
            args: config.args.clone(),
            api_key_env: config.api_key_env.clone(),
        })
    }
}

impl GenerationService for CommandCompletion {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        if let Some(var) = &self.api_key_env {
            match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => {}
                _ => return Err(GenerationError::MissingCredential(format!("{} is not set", var))),
            }
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GenerationError::Transport(format!("failed to run {}: {}", self.program, e)))?;

        // Stdin is dropped before waiting so the child sees EOF. A failed
        // write is reported only after the child has been reaped.
        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(prompt.as_bytes()),
            None => Ok(()),
        };

        let output = child
            .wait_with_output()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(GenerationError::Transport(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        if let Err(e) = sent {
            return Err(GenerationError::Transport(format!(
                "failed to send prompt to {} ({}): {}",
                self.program,
                e,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Used when neither a response file nor a command is configured.
pub struct Unconfigured;

impl GenerationService for Unconfigured {
    fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::MissingCredential(
            "no generation command configured; set [generation] command in totsy.toml or pass --response-file".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_completion_replays_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.json");
        std::fs::write(&path, "{\"categories\": []}").unwrap();

        let service = FileCompletion::new(&path);
        assert_eq!(service.complete("ignored").unwrap(), "{\"categories\": []}");
    }

    #[test]
    fn test_missing_file_is_transport_error() {
        let service = FileCompletion::new("/definitely/not/here.json");
        assert!(matches!(
            service.complete(""),
            Err(GenerationError::Transport(_))
        ));
    }

    #[test]
    fn test_command_requires_configured_program() {
        assert!(CommandCompletion::from_config(&GenerationConfig::default()).is_none());

        let config = GenerationConfig {
            command: Some("   ".to_string()),
            ..GenerationConfig::default()
        };
        assert!(CommandCompletion::from_config(&config).is_none());
    }

    #[test]
    fn test_missing_api_key_is_credential_error() {
        let config = GenerationConfig {
            command: Some("cat".to_string()),
            args: Vec::new(),
            api_key_env: Some("TOTSY_TEST_KEY_THAT_IS_NEVER_SET".to_string()),
        };
        let service = CommandCompletion::from_config(&config).unwrap();
        assert!(matches!(
            service.complete("prompt"),
            Err(GenerationError::MissingCredential(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exiting_without_reading_reports_status() {
        let config = GenerationConfig {
            command: Some("sh".to_string()),
            args: vec!["-c".to_string(), "echo quota exceeded >&2; exit 3".to_string()],
            api_key_env: None,
        };
        let service = CommandCompletion::from_config(&config).unwrap();
        let prompt = "x".repeat(4 * 1024 * 1024);

        match service.complete(&prompt) {
            Err(GenerationError::Transport(message)) => {
                assert!(message.contains("exited with"), "message was {}", message);
                assert!(message.contains("quota exceeded"), "message was {}", message);
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_output_is_returned() {
        let config = GenerationConfig {
            command: Some("cat".to_string()),
            args: Vec::new(),
            api_key_env: None,
        };
        let service = CommandCompletion::from_config(&config).unwrap();
        assert_eq!(service.complete("{\"categories\": []}").unwrap(), "{\"categories\": []}");
    }

    #[test]
    fn test_unconfigured_points_at_config() {
        let error = Unconfigured.complete("x").unwrap_err();
        assert!(error.is_credential_problem());
    }
}

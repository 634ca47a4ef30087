//! Spoken confirmations for committed writes.
//!
//! Announcements run through external commands: a synthesis step renders the
//! phrase (optionally into a temporary clip) and a playback step plays it.
//! Both steps block until the child process exits, so control only returns
//! once the announcement has finished.

use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;
use thiserror::Error;

/// Failures raised while voicing an announcement. These never roll back the
/// database write they follow; the UI reports them and moves on.
#[derive(Debug, Error)]
pub enum AnnounceError {
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// Anything that can voice a phrase for the operator. Implementations block
/// until the announcement is over.
pub trait Announcer {
    fn announce(&self, text: &str) -> Result<(), AnnounceError>;
}

/// An announcer that swallows every phrase. Used where audio is unwanted,
/// such as tests.
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&self, _text: &str) -> Result<(), AnnounceError> {
        Ok(())
    }
}

/// Voices phrases by shelling out to a synthesis command and a playback
/// command. Each command is a template; `{text}` is replaced with the phrase
/// and `{clip}` with the path of a temporary audio file that lives for the
/// duration of the announcement.
pub struct CommandAnnouncer {
    synthesize: Vec<String>,
    play: Vec<String>,
}

impl CommandAnnouncer {
    pub fn new(synthesize: Vec<String>, play: Vec<String>) -> Self {
        Self { synthesize, play }
    }

    /// The stock configuration for the current platform. macOS speaks
    /// directly through `say`; elsewhere `espeak` renders a clip that
    /// `aplay` then plays.
    pub fn system_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new(
                vec!["say".to_string(), "{text}".to_string()],
                Vec::new(),
            )
        } else {
            Self::new(
                vec![
                    "espeak".to_string(),
                    "-w".to_string(),
                    "{clip}".to_string(),
                    "{text}".to_string(),
                ],
                vec!["aplay".to_string(), "-q".to_string(), "{clip}".to_string()],
            )
        }
    }
}

impl Announcer for CommandAnnouncer {
    fn announce(&self, text: &str) -> Result<(), AnnounceError> {
        let clip = NamedTempFile::new()
            .map_err(|err| AnnounceError::Synthesis(format!("could not create clip: {err}")))?;

        let synthesize = fill(&self.synthesize, text, clip.path());
        run_step(&synthesize, AnnounceError::Synthesis)?;

        // An empty playback template means the synthesis step already spoke.
        if !self.play.is_empty() {
            let play = fill(&self.play, text, clip.path());
            run_step(&play, AnnounceError::Playback)?;
        }

        Ok(())
    }
}

fn fill(template: &[String], text: &str, clip: &Path) -> Vec<String> {
    let clip = clip.to_string_lossy();
    template
        .iter()
        .map(|part| part.replace("{text}", text).replace("{clip}", clip.as_ref()))
        .collect()
}

fn run_step(
    command: &[String],
    failure: fn(String) -> AnnounceError,
) -> Result<(), AnnounceError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| failure("no command configured".to_string()))?;

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|err| failure(format!("could not run {program}: {err}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(failure(format!("{program} exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn templates_substitute_text_and_clip() {
        let template = vec![
            "espeak".to_string(),
            "-w".to_string(),
            "{clip}".to_string(),
            "{text}".to_string(),
        ];
        let clip = PathBuf::from("/tmp/announcement.wav");

        let filled = fill(&template, "Flight AI202 has been added.", &clip);
        assert_eq!(
            filled,
            vec![
                "espeak",
                "-w",
                "/tmp/announcement.wav",
                "Flight AI202 has been added.",
            ]
        );
    }

    #[test]
    fn successful_steps_complete_the_announcement() {
        let announcer = CommandAnnouncer::new(
            vec!["true".to_string(), "{text}".to_string()],
            Vec::new(),
        );
        announcer.announce("all good").unwrap();
    }

    #[test]
    fn a_failing_synthesis_step_is_reported() {
        let announcer = CommandAnnouncer::new(vec!["false".to_string()], Vec::new());
        let err = announcer.announce("will not speak").unwrap_err();
        assert!(matches!(err, AnnounceError::Synthesis(_)));
    }

    #[test]
    fn a_failing_playback_step_is_reported() {
        let announcer = CommandAnnouncer::new(
            vec!["true".to_string()],
            vec!["false".to_string(), "{clip}".to_string()],
        );
        let err = announcer.announce("renders but will not play").unwrap_err();
        assert!(matches!(err, AnnounceError::Playback(_)));
    }

    #[test]
    fn the_null_announcer_always_succeeds() {
        NullAnnouncer.announce("anything").unwrap();
    }
}

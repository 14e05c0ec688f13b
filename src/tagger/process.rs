use std::fs;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::{ChildStderr, Command, ExitStatus, Stdio};

use thiserror::Error;

use super::config::{DecodeError, Encoding, TaggerConfig};
use super::parser::{parse_phrases, parse_tokens, TaggerOutputError};
use super::{prepare_input, TaggerClient};
use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
use crate::types::{PhraseIndex, TaggedToken};

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Tagger command is empty")]
    EmptyCommand,
    #[error("Cannot start tagger command {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Tagger command {command:?} exited with {status}")]
    Failed { command: String, status: ExitStatus },
    #[error("Tagger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Output(#[from] TaggerOutputError),
}

/// Runs the external tagger as a subprocess, exchanging data through the
/// configured temp files.
///
/// Every call blocks until the subprocess exits. There is no timeout.
pub struct ProcessTagger<D = LogSink> {
    config: TaggerConfig,
    diagnostics: D,
}

impl ProcessTagger<LogSink> {
    pub fn new(config: TaggerConfig) -> Self {
        Self {
            config,
            diagnostics: LogSink,
        }
    }
}

impl<D: DiagnosticSink> ProcessTagger<D> {
    pub fn with_diagnostics(config: TaggerConfig, diagnostics: D) -> Self {
        Self {
            config,
            diagnostics,
        }
    }

    /// Write the input file, run `command`, and return the decoded output file.
    fn run(
        &self,
        command: &str,
        text: &str,
        input_encoding: Encoding,
    ) -> Result<String, TaggerError> {
        let input = prepare_input(text);
        write_file(&self.config.temp_file_in, &input_encoding.encode(&input))?;

        remove_stale(&self.config.temp_file_out)?;

        let mut parts = command.split_whitespace();
        let program = parts.next().ok_or(TaggerError::EmptyCommand)?;

        let mut child = Command::new(program)
            .args(parts)
            .arg(&self.config.temp_file_in)
            .arg(&self.config.temp_file_out)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TaggerError::Spawn {
                command: command.to_string(),
                source,
            })?;

        // Drain stderr to EOF before waiting, or a chatty tagger blocks on a full pipe.
        let drained = match child.stderr.take() {
            Some(stderr) => self.drain_stderr(stderr),
            None => Ok(()),
        };
        if drained.is_err() {
            // Nobody reads the pipe any more; stop the tagger so it can be reaped.
            let _ = child.kill();
        }

        let status = child.wait().map_err(|source| TaggerError::Spawn {
            command: command.to_string(),
            source,
        });
        drained?;
        let status = status?;
        if !status.success() {
            return Err(TaggerError::Failed {
                command: command.to_string(),
                status,
            });
        }

        let bytes = fs::read(&self.config.temp_file_out).map_err(|source| TaggerError::Io {
            path: self.config.temp_file_out.clone(),
            source,
        })?;
        Ok(self.config.encoding.decode(bytes)?)
    }

    fn drain_stderr(&self, stderr: ChildStderr) -> Result<(), TaggerError> {
        for line in BufReader::new(stderr).split(b'\n') {
            let line = line.map_err(|source| TaggerError::Io {
                path: PathBuf::from("<tagger stderr>"),
                source,
            })?;
            let line = String::from_utf8_lossy(&line).trim_end_matches('\r').to_string();
            self.diagnostics.emit(Diagnostic::TaggerStderr { line });
        }
        Ok(())
    }
}

impl<D: DiagnosticSink> TaggerClient for ProcessTagger<D> {
    type Error = TaggerError;

    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TaggerError> {
        log::info!("tagging sentence \"{text}\"");
        let output = self.run(&self.config.tag_command, text, self.config.encoding)?;
        Ok(parse_tokens(&output)?)
    }

    fn chunk(&self, text: &str) -> Result<PhraseIndex, TaggerError> {
        log::info!("tagging \"{text}\"");
        // Chunker input is always UTF-8, whatever the configured encoding.
        let output = self.run(&self.config.chunk_command, text, Encoding::Utf8)?;
        Ok(parse_phrases(&output)?)
    }
}

/// Remove output left by an earlier run, so a silent tagger cannot replay it.
fn remove_stale(path: &Path) -> Result<(), TaggerError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(TaggerError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), TaggerError> {
    fs::write(path, bytes).map_err(|source| TaggerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

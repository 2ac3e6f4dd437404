//! SIPp command line built from a [`SippConfig`]

use std::process::Stdio;

use tokio::process::Command;

use crate::config::{Scenario, SippConfig};
use crate::error::Result;

/// A validated SIPp invocation: program plus argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SippCommand {
    program: String,
    args: Vec<String>,
}

impl SippCommand {
    /// Builds the argument vector for `config`, validating it first.
    ///
    /// Flags appear in a fixed order with the remote target last, e.g.
    /// `sipp -m 1 -sf uac-uas.xml -s 0312341234 -d 500 -trace_msg -message_file sip.log localhost`.
    pub fn from_config(config: &SippConfig) -> Result<Self> {
        config.validate()?;

        let mut args: Vec<String> = Vec::new();
        let mut flag = |name: &str, value: String| {
            args.push(name.to_string());
            args.push(value);
        };

        if let Some(calls) = config.max_calls {
            flag("-m", calls.to_string());
        }
        match &config.scenario {
            Scenario::File(path) => flag("-sf", path.display().to_string()),
            Scenario::Builtin(name) => flag("-sn", name.clone()),
        }
        if let Some(service) = &config.service {
            flag("-s", service.clone());
        }
        if let Some(duration) = config.call_duration {
            flag("-d", duration.as_millis().to_string());
        }
        if let Some(path) = &config.inject_file {
            flag("-inf", path.display().to_string());
        }
        if let Some(rate) = config.call_rate {
            flag("-r", rate.to_string());
        }
        if let Some(limit) = config.concurrent_calls {
            flag("-l", limit.to_string());
        }
        if let Some(ip) = &config.local_ip {
            flag("-i", ip.clone());
        }
        if let Some(port) = config.local_port {
            flag("-p", port.to_string());
        }
        if let Some(ip) = &config.media_ip {
            flag("-mi", ip.clone());
        }
        if let Some(port) = config.media_port {
            flag("-mp", port.to_string());
        }

        if let Some(path) = &config.message_file {
            args.push("-trace_msg".to_string());
            args.push("-message_file".to_string());
            args.push(path.display().to_string());
        }

        args.push(match config.remote_port {
            Some(port) => format!("{}:{}", config.remote_host, port),
            None => config.remote_host.clone(),
        });

        Ok(SippCommand {
            program: config.binary_path.clone(),
            args,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The exact command as one space-separated line
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A process builder for this invocation with all standard streams discarded
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

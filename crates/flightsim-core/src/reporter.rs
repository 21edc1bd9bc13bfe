//! Timestamped, line-oriented progress output.

use chrono::Local;
use std::io::{self, Write};
use std::net::IpAddr;

const RULE_WIDTH: usize = 80;

/// Writes progress lines as `<time>  <module>  <message>`.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Opening banner with the source address and the wall-clock time.
    pub fn welcome(&mut self, source: IpAddr) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Network Flight Simulator {}",
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(self.out, "The IP address of the network interface is {}", source)?;
        writeln!(
            self.out,
            "The current time is {}",
            Local::now().format("%d-%b-%y %H:%M:%S")
        )?;
        writeln!(self.out)
    }

    /// Column titles followed by a rule.
    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "Time      Module   Description")?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))
    }

    /// One progress line for `module`.
    pub fn msg(&mut self, module: &str, message: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{}  {:<7}  {}",
            Local::now().format("%H:%M:%S"),
            module,
            message
        )?;
        self.out.flush()
    }

    /// One progress line per message, in order.
    pub fn msgs<S: AsRef<str>>(&mut self, module: &str, messages: &[S]) -> io::Result<()> {
        for message in messages {
            self.msg(module, message.as_ref())?;
        }
        Ok(())
    }

    pub fn goodbye(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "All done! Check your SIEM for alerts using the timestamps and details above."
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

use clap::Parser;
use rdpgate_common::config::Mode;

#[derive(Parser)]
#[command(name = "rdpgate")]
#[command(version)]
#[command(about = "Writes a remote desktop connection file pointing at this machine's default gateway.")]
pub struct CommandLine {
    /// Pass `manual` alone to type an address, override the port and open the result
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "MODE")]
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn mode(&self) -> Mode {
        Mode::from_args(&self.args)
    }
}

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "marina-admin",
    about = "Boat & jetski rental administration service"
)]
pub struct Opt {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    pub config: clio::Input,
}

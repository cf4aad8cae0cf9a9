use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Forwarding relay that streams caller-specified targets with header rewriting"
)]
pub struct Args {}

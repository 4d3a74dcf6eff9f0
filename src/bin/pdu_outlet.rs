//! pdu-outlet: switch a CyberPower PDU outlet on or off.

use clap::Parser;
use cyberpower_pdu::PduClient;
use cyberpower_pdu::cli::args::{Args, init_tracing};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing();

    let pdu = PduClient::new(args.pdu_host());
    match pdu.set_outlet_power(args.outlet, args.state.is_on()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

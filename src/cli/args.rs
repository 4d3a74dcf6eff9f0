//! Command-line arguments for `pdu-outlet`.

use clap::{Parser, ValueEnum};

use crate::outlet::{OutletCommand, OutletId, PduHost};

/// Desired outlet state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    /// True for `on`.
    pub fn is_on(self) -> bool {
        self == PowerState::On
    }
}

impl From<PowerState> for OutletCommand {
    fn from(state: PowerState) -> Self {
        OutletCommand::from_power(state.is_on())
    }
}

/// Switch one outlet of a CyberPower PDU on or off.
#[derive(Debug, Parser)]
#[command(name = "pdu-outlet", version, about)]
pub struct Args {
    /// PDU hostname or IP address, optionally host:port (default port 161).
    #[arg(value_name = "HOST")]
    pub host: String,

    /// Outlet number, starting at 1.
    #[arg(value_name = "OUTLET")]
    pub outlet: OutletId,

    /// Desired state.
    #[arg(value_name = "STATE")]
    pub state: PowerState,
}

impl Args {
    /// The `HOST` argument as a [`PduHost`].
    pub fn pdu_host(&self) -> PduHost {
        PduHost::new(self.host.as_str())
    }
}

/// Install the stderr log subscriber.
///
/// Only library warnings are shown; the tool takes no logging flags.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("cyberpower_pdu=warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positionals() {
        let args = Args::try_parse_from(["pdu-outlet", "10.0.0.5", "3", "on"]).unwrap();
        assert_eq!(args.pdu_host().as_str(), "10.0.0.5");
        assert_eq!(args.outlet.get(), 3);
        assert_eq!(args.state, PowerState::On);
        assert_eq!(OutletCommand::from(args.state), OutletCommand::ImmediateOn);

        let args = Args::try_parse_from(["pdu-outlet", "pdu1.lab:1161", "8", "off"]).unwrap();
        assert_eq!(args.pdu_host().port(), Some(1161));
        assert!(!args.state.is_on());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Args::try_parse_from(["pdu-outlet", "10.0.0.5", "3", "toggle"]).is_err());
        assert!(Args::try_parse_from(["pdu-outlet", "10.0.0.5", "0", "on"]).is_err());
        assert!(Args::try_parse_from(["pdu-outlet", "10.0.0.5", "3"]).is_err());
        assert!(Args::try_parse_from(["pdu-outlet", "10.0.0.5", "3", "on", "--community", "x"]).is_err());
    }
}

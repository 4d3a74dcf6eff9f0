//! Outlet control commands (`CPS-MIB::ePDUOutletControlOutletCommand`).

use std::fmt;
use std::str::FromStr;

use crate::oid::Oid;

use super::OutletId;

/// Column OID of `ePDUOutletControlOutletCommand`.
///
/// Each outlet is a row of the table; its instance is this OID plus the outlet
/// number as the final arc.
pub const OUTLET_COMMAND_OID: [u32; 15] = [1, 3, 6, 1, 4, 1, 3808, 1, 1, 3, 3, 3, 1, 1, 4];

/// Instance OID controlling `outlet`.
///
/// ```
/// use cyberpower_pdu::{OutletId, outlet_command_oid};
///
/// let oid = outlet_command_oid(OutletId::new(3).unwrap());
/// assert_eq!(oid.to_string(), "1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4.3");
/// ```
pub fn outlet_command_oid(outlet: OutletId) -> Oid {
    Oid::from_slice(&OUTLET_COMMAND_OID).child(outlet.get())
}

/// A command written to an outlet's control object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutletCommand {
    ImmediateOn,
    ImmediateOff,
    ImmediateReboot,
    DelayedOn,
    DelayedOff,
    DelayedReboot,
    CancelPendingCommand,
    OutletIdentify,
}

impl OutletCommand {
    /// Every command, in code order.
    pub const ALL: [OutletCommand; 8] = [
        Self::ImmediateOn,
        Self::ImmediateOff,
        Self::ImmediateReboot,
        Self::DelayedOn,
        Self::DelayedOff,
        Self::DelayedReboot,
        Self::CancelPendingCommand,
        Self::OutletIdentify,
    ];

    /// `immediateOn` for `true`, `immediateOff` for `false`.
    pub fn from_power(on: bool) -> Self {
        if on {
            Self::ImmediateOn
        } else {
            Self::ImmediateOff
        }
    }

    /// The INTEGER value the MIB assigns to this command.
    pub fn code(self) -> i32 {
        match self {
            Self::ImmediateOn => 1,
            Self::ImmediateOff => 2,
            Self::ImmediateReboot => 3,
            Self::DelayedOn => 4,
            Self::DelayedOff => 5,
            Self::DelayedReboot => 6,
            Self::CancelPendingCommand => 7,
            Self::OutletIdentify => 8,
        }
    }

    /// Resolve a MIB code back to its command.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.code() == code)
    }

    /// The MIB enumeration label, e.g. `immediateOn`.
    pub fn name(self) -> &'static str {
        match self {
            Self::ImmediateOn => "immediateOn",
            Self::ImmediateOff => "immediateOff",
            Self::ImmediateReboot => "immediateReboot",
            Self::DelayedOn => "delayedOn",
            Self::DelayedOff => "delayedOff",
            Self::DelayedReboot => "delayedReboot",
            Self::CancelPendingCommand => "cancelPendingCommand",
            Self::OutletIdentify => "outletIdentify",
        }
    }
}

impl fmt::Display for OutletCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string is not a MIB command label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown outlet command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for OutletCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_command_table() {
        let table = [
            ("immediateOn", 1),
            ("immediateOff", 2),
            ("immediateReboot", 3),
            ("delayedOn", 4),
            ("delayedOff", 5),
            ("delayedReboot", 6),
            ("cancelPendingCommand", 7),
            ("outletIdentify", 8),
        ];
        for (command, (name, code)) in OutletCommand::ALL.into_iter().zip(table) {
            assert_eq!(command.name(), name);
            assert_eq!(command.code(), code);
            assert_eq!(OutletCommand::from_code(code), Some(command));
            assert_eq!(name.parse::<OutletCommand>(), Ok(command));
            assert_eq!(command.to_string(), name);
        }
    }

    #[test]
    fn test_from_power() {
        assert_eq!(OutletCommand::from_power(true).code(), 1);
        assert_eq!(OutletCommand::from_power(false).code(), 2);
    }

    #[test]
    fn test_unknown_codes_and_names() {
        assert_eq!(OutletCommand::from_code(0), None);
        assert_eq!(OutletCommand::from_code(9), None);
        assert_eq!(
            "ImmediateOn".parse::<OutletCommand>(),
            Err(UnknownCommand("ImmediateOn".into()))
        );
    }

    #[test]
    fn test_outlet_command_oid_prefix() {
        let oid = outlet_command_oid(OutletId::new(1).unwrap());
        assert_eq!(oid.to_string(), "1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4.1");
        assert!(oid.starts_with(&Oid::from_slice(&OUTLET_COMMAND_OID)));
    }

    proptest! {
        #[test]
        fn outlet_is_final_arc(n in 1u32..=u32::MAX) {
            let oid = outlet_command_oid(OutletId::new(n).unwrap());
            prop_assert_eq!(oid.len(), OUTLET_COMMAND_OID.len() + 1);
            prop_assert_eq!(&oid.arcs()[..OUTLET_COMMAND_OID.len()], &OUTLET_COMMAND_OID[..]);
            prop_assert_eq!(oid.arcs().last().copied(), Some(n));
        }

        #[test]
        fn codes_resolve_uniquely(code in any::<i32>()) {
            match OutletCommand::from_code(code) {
                Some(command) => prop_assert_eq!(command.code(), code),
                None => prop_assert!(!(1..=8).contains(&code)),
            }
        }
    }
}

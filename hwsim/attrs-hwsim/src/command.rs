use tlv_hwsim::{OperationContext, OperationFlags};

use crate::Error;

/// Commands of the hwsim family (`enum hwsim_commands`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HwsimCmd {
    Register = 1,
    Frame = 2,
    TxInfoFrame = 3,
    NewRadio = 4,
    DelRadio = 5,
    GetRadio = 6,
    AddMacAddr = 7,
    DelMacAddr = 8,
    YawmdTxInfo = 9,
    YawmdRxInfo = 10,
}

impl HwsimCmd {
    /// Flags the command is registered with.
    ///
    /// The legacy commands predate strict attribute validation and keep accepting unknown
    /// attributes. The YAWMD exchange is validated strictly.
    pub const fn flags(self) -> OperationFlags {
        match self {
            HwsimCmd::YawmdTxInfo | HwsimCmd::YawmdRxInfo => OperationFlags::NONE,
            _ => OperationFlags::DONT_VALIDATE_STRICT,
        }
    }

    /// Context for decoding this command when it arrives from the peer.
    pub const fn peer_context(self) -> OperationContext {
        OperationContext::peer(self.flags())
    }
}

impl TryFrom<u8> for HwsimCmd {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => HwsimCmd::Register,
            2 => HwsimCmd::Frame,
            3 => HwsimCmd::TxInfoFrame,
            4 => HwsimCmd::NewRadio,
            5 => HwsimCmd::DelRadio,
            6 => HwsimCmd::GetRadio,
            7 => HwsimCmd::AddMacAddr,
            8 => HwsimCmd::DelMacAddr,
            9 => HwsimCmd::YawmdTxInfo,
            10 => HwsimCmd::YawmdRxInfo,
            other => return Err(Error::UnknownCommand(other)),
        })
    }
}

impl From<HwsimCmd> for u8 {
    fn from(cmd: HwsimCmd) -> Self {
        cmd as u8
    }
}

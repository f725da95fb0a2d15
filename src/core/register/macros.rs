#[allow(unused_imports)]
use super::{RegisterInfo, RegisterType};

// Macro to define register information for a 64-bit general-purpose register.
macro_rules! gp_reg {
    ($name:ident) => {
        RegisterInfo {
            name: stringify!($name),
            index: None,
            size: 8,
            reg_type: RegisterType::GeneralPurpose,
        }
    };
}

pub(crate) use gp_reg;

// Macro to define register information for an x87 control/status register.
macro_rules! fp_ctrl_reg {
    ($name:ident) => {
        RegisterInfo {
            name: stringify!($name),
            index: None,
            size: 4,
            reg_type: RegisterType::FloatControl,
        }
    };
}

pub(crate) use fp_ctrl_reg;

// Macro to define register information for a `st` floating-point register.
macro_rules! fp_reg_st {
    ($number:expr) => {
        RegisterInfo {
            name: concat!("st", stringify!($number)),
            index: Some($number),
            size: 10,
            reg_type: RegisterType::X87,
        }
    };
}

pub(crate) use fp_reg_st;

// Macro to define register information for a `mm` register, aliasing the low
// 64 bits of the matching `st` register.
macro_rules! fp_reg_mm {
    ($number:expr) => {
        RegisterInfo {
            name: concat!("mm", stringify!($number)),
            index: Some($number),
            size: 8,
            reg_type: RegisterType::Mmx,
        }
    };
}

pub(crate) use fp_reg_mm;

// Macro to define register information for a `xmm` vector register.
macro_rules! vec_reg_xmm {
    ($number:expr) => {
        RegisterInfo {
            name: concat!("xmm", stringify!($number)),
            index: Some($number),
            size: 16,
            reg_type: RegisterType::Sse,
        }
    };
}

pub(crate) use vec_reg_xmm;

// Macro to define register information for a `ymm` vector register.
macro_rules! vec_reg_ymm {
    ($number:expr) => {
        RegisterInfo {
            name: concat!("ymm", stringify!($number)),
            index: Some($number),
            size: 32,
            reg_type: RegisterType::Avx,
        }
    };
}

pub(crate) use vec_reg_ymm;

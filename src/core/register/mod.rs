//! Defines information on the registers the viewer knows how to display.

mod macros;
pub(crate) use macros::{fp_ctrl_reg, fp_reg_mm, fp_reg_st, gp_reg, vec_reg_xmm, vec_reg_ymm};

mod register_info;
pub(crate) use register_info::{FCTRL, FSTAT};
pub use register_info::{RegisterInfo, RegisterType};

use super::{fp_ctrl_reg, fp_reg_mm, fp_reg_st, gp_reg, vec_reg_xmm, vec_reg_ymm};

/// Specifies the class of a given [`RegisterInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterType {
    /// 64-bit general-purpose registers, `rip`, and `eflags`.
    GeneralPurpose,
    /// x87 control, status, and tag words.
    FloatControl,
    /// x87 stack registers `st0..st7`.
    X87,
    /// MMX registers `mm0..mm7`.
    Mmx,
    /// 128-bit SSE registers `xmm0..xmm15`.
    Sse,
    /// 256-bit AVX registers `ymm0..ymm15`.
    Avx,
}

/// Collection of information needed for a single [`RegisterInfo`].
#[derive(Debug)]
pub struct RegisterInfo {
    /// Name of the register as GDB prints it (lowercase).
    pub name: &'static str,
    /// Position within a numbered register file (`st3` -> 3).
    pub index: Option<usize>,
    /// Size of register in bytes.
    pub size: usize,
    /// Class of register.
    pub reg_type: RegisterType,
}

impl RegisterInfo {
    /// Find a register by its name and return a reference to the [`RegisterInfo`].
    ///
    /// Lookup is case-insensitive.
    pub fn register_info_by_name(name: &str) -> Option<&'static RegisterInfo> {
        REGISTER_INFO
            .iter()
            .find(|&reg| reg.name.eq_ignore_ascii_case(name))
    }

    /// Iterate over all registers of the given type, in display order.
    pub fn registers_of(reg_type: RegisterType) -> impl Iterator<Item = &'static RegisterInfo> {
        REGISTER_INFO
            .iter()
            .filter(move |reg| reg.reg_type == reg_type)
    }

    /// Return the register of type `reg_type` numbered `index`, if any.
    pub fn register_info_by_index(
        reg_type: RegisterType,
        index: usize,
    ) -> Option<&'static RegisterInfo> {
        Self::registers_of(reg_type).find(|reg| reg.index == Some(index))
    }
}

/// Name GDB uses for the x87 status word.
pub(crate) const FSTAT: &str = "fstat";
/// Name GDB uses for the x87 control word.
pub(crate) const FCTRL: &str = "fctrl";

// `RegisterInfo` definitions for the general-purpose table (in display order),
// the x87 control words, and the st, mm, xmm, and ymm register files.
const REGISTER_INFO: &[RegisterInfo] = &[
    gp_reg!(rax),
    gp_reg!(rbx),
    gp_reg!(rcx),
    gp_reg!(rdx),
    gp_reg!(rsi),
    gp_reg!(rdi),
    gp_reg!(rbp),
    gp_reg!(rsp),
    gp_reg!(r8),
    gp_reg!(r9),
    gp_reg!(r10),
    gp_reg!(r11),
    gp_reg!(r12),
    gp_reg!(r13),
    gp_reg!(r14),
    gp_reg!(r15),
    gp_reg!(rip),
    gp_reg!(eflags),
    //=========================================================================
    fp_ctrl_reg!(fctrl),
    fp_ctrl_reg!(fstat),
    fp_ctrl_reg!(ftag),
    fp_ctrl_reg!(fiseg),
    fp_ctrl_reg!(fioff),
    fp_ctrl_reg!(foseg),
    fp_ctrl_reg!(fooff),
    fp_ctrl_reg!(fop),
    fp_ctrl_reg!(mxcsr),
    //=========================================================================
    fp_reg_st!(0),
    fp_reg_st!(1),
    fp_reg_st!(2),
    fp_reg_st!(3),
    fp_reg_st!(4),
    fp_reg_st!(5),
    fp_reg_st!(6),
    fp_reg_st!(7),
    //=========================================================================
    fp_reg_mm!(0),
    fp_reg_mm!(1),
    fp_reg_mm!(2),
    fp_reg_mm!(3),
    fp_reg_mm!(4),
    fp_reg_mm!(5),
    fp_reg_mm!(6),
    fp_reg_mm!(7),
    //=========================================================================
    vec_reg_xmm!(0),
    vec_reg_xmm!(1),
    vec_reg_xmm!(2),
    vec_reg_xmm!(3),
    vec_reg_xmm!(4),
    vec_reg_xmm!(5),
    vec_reg_xmm!(6),
    vec_reg_xmm!(7),
    vec_reg_xmm!(8),
    vec_reg_xmm!(9),
    vec_reg_xmm!(10),
    vec_reg_xmm!(11),
    vec_reg_xmm!(12),
    vec_reg_xmm!(13),
    vec_reg_xmm!(14),
    vec_reg_xmm!(15),
    //=========================================================================
    vec_reg_ymm!(0),
    vec_reg_ymm!(1),
    vec_reg_ymm!(2),
    vec_reg_ymm!(3),
    vec_reg_ymm!(4),
    vec_reg_ymm!(5),
    vec_reg_ymm!(6),
    vec_reg_ymm!(7),
    vec_reg_ymm!(8),
    vec_reg_ymm!(9),
    vec_reg_ymm!(10),
    vec_reg_ymm!(11),
    vec_reg_ymm!(12),
    vec_reg_ymm!(13),
    vec_reg_ymm!(14),
    vec_reg_ymm!(15),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let info = RegisterInfo::register_info_by_name("XMM7").unwrap();
        assert_eq!(info.name, "xmm7");
        assert_eq!(info.index, Some(7));
        assert_eq!(info.reg_type, RegisterType::Sse);
    }

    #[test]
    fn register_files_have_expected_sizes() {
        assert_eq!(RegisterInfo::registers_of(RegisterType::GeneralPurpose).count(), 18);
        assert_eq!(RegisterInfo::registers_of(RegisterType::X87).count(), 8);
        assert_eq!(RegisterInfo::registers_of(RegisterType::Mmx).count(), 8);
        assert_eq!(RegisterInfo::registers_of(RegisterType::Sse).count(), 16);
        assert_eq!(RegisterInfo::registers_of(RegisterType::Avx).count(), 16);
    }

    #[test]
    fn general_purpose_order_starts_with_rax_and_ends_with_eflags() {
        let names: Vec<_> = RegisterInfo::registers_of(RegisterType::GeneralPurpose)
            .map(|reg| reg.name)
            .collect();
        assert_eq!(names.first(), Some(&"rax"));
        assert_eq!(names.last(), Some(&"eflags"));
    }

    #[test]
    fn index_lookup() {
        let ymm = RegisterInfo::register_info_by_index(RegisterType::Avx, 12).unwrap();
        assert_eq!(ymm.name, "ymm12");
        assert!(RegisterInfo::register_info_by_index(RegisterType::Mmx, 8).is_none());
    }
}

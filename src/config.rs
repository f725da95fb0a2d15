//! Collects, parses, and validates command-line arguments.

use std::{env, process};

use crate::core::codec::NumericBase;
use crate::core::detect::DetectorConfig;
use crate::core::lane::{LaneSelection, VectorClass};
use crate::core::view::{FloatView, FormatRequest, GpFormat, MmxFormat, Platform};
use crate::utils::log_err;
use crate::{Error, Result};

/// Configuration options to control how registers are displayed.
#[derive(Debug)]
pub struct Config {
    /// Name of the viewer program.
    pub program: String,
    /// Path of the register dump; `None` reads standard input.
    pub input: Option<String>,
    /// Calling convention of the ABI table.
    pub platform: Platform,
    /// Base of integer arguments in the ABI table.
    pub abi_int: NumericBase,
    /// Interpretation of float arguments in the ABI table.
    pub abi_float: FloatView,
    /// Format of the general-purpose table.
    pub gp: GpFormat,
    /// Interpretation of MMX registers.
    pub mmx: MmxFormat,
    /// Lane format of the SSE table.
    pub sse: LaneSelection,
    /// Lane format of the AVX table.
    pub avx: LaneSelection,
    /// Display base of the SSE table.
    pub sse_base: NumericBase,
    /// Display base of the AVX table.
    pub avx_base: NumericBase,
    /// Colour cells by sign and validity.
    pub color: bool,
    /// Auto-detection constants.
    pub detector: DetectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: env!("CARGO_PKG_NAME").to_string(),
            input: None,
            platform: Platform::host(),
            abi_int: NumericBase::Hex,
            abi_float: FloatView::Float,
            gp: GpFormat::Hex,
            mmx: MmxFormat::Hex,
            sse: LaneSelection::Auto,
            avx: LaneSelection::Auto,
            sse_base: NumericBase::Dec,
            avx_base: NumericBase::Dec,
            color: true,
            detector: DetectorConfig::default(),
        }
    }
}

impl Config {
    /// Parses command-line arguments and returns a new [`Config`].
    ///
    /// The function will terminate the program early if:
    ///
    /// - The `--help` or `-h` flag is provided
    /// - The `--version` or `-v` flag is provided
    /// - An unrecognized or invalid command-line option is encountered
    ///
    /// # Panics
    ///
    /// Panics if the program name is missing from the command-line arguments.
    pub fn parse() -> Self {
        let mut args = env::args();
        let program = args.next().expect("missing program name");

        match Self::from_args(&program, args) {
            Ok(opts) => opts,
            Err(err) => {
                log_err(&program, err);
                print_usage(&program); // Exits
            }
        }
    }

    /// Builds a [`Config`] from the arguments following the program name.
    pub fn from_args<I>(program: &str, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self {
            program: program.to_string(),
            ..Self::default()
        };

        let mut args = args.into_iter();
        let mut seen_input = false;

        while let Some(arg) = args.next() {
            if arg.starts_with('-') && arg != "-" {
                let flag = FLAG_REGISTRY
                    .iter()
                    .find(|f| f.names.contains(&arg.as_str()))
                    .ok_or_else(|| Error::UnrecognizedOption(arg.clone()))?;

                let value = match flag.value {
                    Some(_) => Some(args.next().ok_or_else(|| Error::MissingValue(arg.clone()))?),
                    None => None,
                };

                (flag.run)(program, &mut opts, value.as_deref())?;
            } else {
                // Any argument not beginning with `-` is the dump path; `-`
                // explicitly selects standard input.
                if seen_input {
                    return Err(Error::InvalidOption {
                        option: "input",
                        value: arg,
                    });
                }
                seen_input = true;
                opts.input = (arg != "-").then_some(arg);
            }
        }

        Ok(opts)
    }

    /// Vector table request for `class` under these options.
    pub fn format_request(&self, class: VectorClass) -> FormatRequest {
        let (format, base) = match class {
            VectorClass::Sse => (self.sse, self.sse_base),
            VectorClass::Avx => (self.avx, self.avx_base),
        };

        FormatRequest {
            class,
            format,
            base,
            color: self.color,
        }
    }
}

struct Flag {
    names: &'static [&'static str],
    value: Option<&'static str>,
    description: &'static str,
    run: fn(&str, &mut Config, Option<&str>) -> Result<()>,
}

fn required(val: Option<&str>) -> &str {
    val.unwrap_or_default()
}

const FLAG_REGISTRY: &[Flag] = &[
    Flag {
        names: &["--platform"],
        value: Some("win|lin"),
        description: "calling convention of the ABI table.",
        run: |_, opts, val| {
            opts.platform = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--abi-int"],
        value: Some("hex|dec"),
        description: "base of integer arguments.",
        run: |_, opts, val| {
            opts.abi_int = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--abi-float"],
        value: Some("float|double|hex"),
        description: "interpretation of float arguments.",
        run: |_, opts, val| {
            opts.abi_float = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--gp"],
        value: Some("hex|dec|bin"),
        description: "format of general-purpose registers.",
        run: |_, opts, val| {
            opts.gp = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--mmx"],
        value: Some("hex|int32|int16|int8"),
        description: "interpretation of MMX registers.",
        run: |_, opts, val| {
            opts.mmx = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--sse"],
        value: Some("auto|<tag>"),
        description: "lane format of xmm registers (e.g. v4_float).",
        run: |_, opts, val| {
            opts.sse = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--avx"],
        value: Some("auto|<tag>"),
        description: "lane format of ymm registers (e.g. v8_int32).",
        run: |_, opts, val| {
            opts.avx = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--sse-base"],
        value: Some("dec|hex"),
        description: "display base of xmm lanes.",
        run: |_, opts, val| {
            opts.sse_base = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--avx-base"],
        value: Some("dec|hex"),
        description: "display base of ymm lanes.",
        run: |_, opts, val| {
            opts.avx_base = required(val).parse()?;
            Ok(())
        },
    },
    Flag {
        names: &["--no-color"],
        value: None,
        description: "disables colouring of values.",
        run: |_, opts, _| {
            opts.color = false;
            Ok(())
        },
    },
    Flag {
        names: &["--help", "-h"],
        value: None,
        description: "displays this help message.",
        run: |program, _, _| print_usage(program),
    },
    Flag {
        names: &["--version", "-v"],
        value: None,
        description: "prints version information.",
        run: |program, _, _| print_version(program),
    },
];

fn print_usage(program: &str) -> ! {
    println!("Usage:");
    println!("      {program} [options] [dump file]");
    println!("  or");
    println!("      gdb -batch -ex 'info all-registers' ... | {program} [options]");
    println!("Options:");

    for flag in FLAG_REGISTRY {
        let names = match flag.value {
            Some(value) => format!("{} <{value}>", flag.names.join(", ")),
            None => flag.names.join(", "),
        };
        println!("      {names:<32} {}", flag.description);
    }

    process::exit(1);
}

fn print_version(program: &str) -> ! {
    println!("{} {}", program, env!("CARGO_PKG_VERSION"));
    process::exit(0);
}

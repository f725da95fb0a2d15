use std::process;

use regview::core::lane::VectorClass;
use regview::core::view::{
    self, Row, render_abi, render_gp, render_mmx, render_vector, render_x87,
};
use regview::utils::{log_err, paint, read_dump};
use regview::{Config, RegisterSnapshot, parse_dump};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opts = Config::parse();

    let raw = read_dump(opts.input.as_deref()).unwrap_or_else(|err| {
        log_err(&opts.program, err);
        process::exit(1);
    });

    let snapshot = parse_dump(&raw);
    if snapshot.is_empty() {
        log::warn!("no registers recognized in input");
    }

    print_abi(&snapshot, &opts);
    print_rows("General-purpose registers", &render_gp(&snapshot, opts.gp), false);
    print_x87(&snapshot, opts.color);
    print_rows("MMX registers", &render_mmx(&snapshot, opts.mmx, opts.color), opts.color);

    for (title, class) in [
        ("SSE registers (xmm)", VectorClass::Sse),
        ("AVX registers (ymm)", VectorClass::Avx),
    ] {
        let rows = render_vector(&snapshot, &opts.format_request(class), &opts.detector);
        print_rows(title, &rows, opts.color);
    }
}

fn heading(title: &str) {
    println!();
    println!("\x1b[1m{title}\x1b[0m");
}

fn print_abi(snapshot: &RegisterSnapshot, opts: &Config) {
    heading(&format!("ABI arguments ({:?})", opts.platform));

    for row in render_abi(snapshot, opts.platform, opts.abi_int, opts.abi_float) {
        println!(
            "  #{:<2} {:>4} {:<20} {:>5} {}",
            row.index,
            row.int_register.to_uppercase(),
            row.int_value,
            row.float_register.to_uppercase(),
            row.float_value,
        );
    }
}

fn print_x87(snapshot: &RegisterSnapshot, color: bool) {
    let table = render_x87(snapshot);
    print_rows("x87 registers", &table.rows, color);

    for (name, flags) in [("fstat", &table.status), ("fctrl", &table.control)] {
        if flags.is_empty() {
            continue;
        }
        let states: Vec<_> = flags
            .iter()
            .map(|flag| format!("{}={}", flag.name, flag.state()))
            .collect();
        println!("  {name:>8}  {}", states.join(" "));
    }
}

fn print_rows(title: &str, rows: &[Row], color: bool) {
    heading(title);

    if rows.is_empty() {
        println!("  (no data)");
        return;
    }

    let width = rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .map(|cell| cell.text.len())
        .max()
        .unwrap_or(0);

    for row in rows {
        let label = if row.fallback {
            format!("{}*", row.label)
        } else {
            row.label.clone()
        };

        let cells: Vec<_> = row
            .cells
            .iter()
            .map(|cell| {
                let padded = format!("{:>width$}", cell.text);
                if color {
                    paint(&padded, cell.tone)
                } else {
                    padded
                }
            })
            .collect();

        println!("  {label:>8}  {}", cells.join(" "));
    }

    if rows.iter().any(|row| row.fallback) {
        println!("  * substituted from the related register; {} marks missing lanes", view::NOT_AVAILABLE);
    }
}

//! tidl binding generator CLI.

use tidlc::commands::{demangle_symbol, explain_error, generate_file, parse_generate_options};

fn main() {
    tidlc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "generate" | "gen" => {
            if args.len() < 3 {
                eprintln!("Usage: tidl generate <model.json> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --out-dir=<dir>     Output directory (default: generated)");
                eprintln!("  --no-abi            Skip C ABI headers and sources");
                eprintln!("  --no-cpp-impl       Skip C++ impl headers (*.impl.hpp)");
                eprintln!("  --no-stubs          Skip author/{{pkg}}.impl.cpp stubs");
                eprintln!("  --dry-run           List files instead of writing them");
                eprintln!("  --color=<mode>      Diagnostics color: auto, always, never");
                std::process::exit(1);
            }
            let options = parse_generate_options(&args[3..]);
            generate_file(&args[2], &options);
        }
        "demangle" => {
            if args.len() < 3 {
                eprintln!("Usage: tidl demangle <symbol>");
                eprintln!("Example: tidl demangle tidlB4_demo5_Shape");
                std::process::exit(1);
            }
            for symbol in &args[2..] {
                demangle_symbol(symbol);
            }
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: tidl explain <ERROR_CODE>");
                eprintln!("Example: tidl explain E5001");
                std::process::exit(1);
            }
            explain_error(&args[2]);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("tidl {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("tidl: C ABI and C++ binding generator");
    println!();
    println!("Usage: tidl <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate <model.json>  Generate bindings for a model file");
    println!("  demangle <symbol>...   Decode tidl symbol names");
    println!("  explain <code>         Explain an error code (e.g., E5001)");
    println!("  help                   Show this help message");
    println!("  version                Show version information");
    println!();
    println!("Generate options:");
    println!("  --out-dir=<dir>     Output directory (default: generated)");
    println!("  --no-abi            Skip C ABI headers and sources");
    println!("  --no-cpp-impl       Skip C++ impl headers (*.impl.hpp)");
    println!("  --no-stubs          Skip author/{{pkg}}.impl.cpp stubs");
    println!("  --dry-run           List files instead of writing them");
    println!("  --color=<mode>      Diagnostics color: auto, always, never");
    println!();
    println!("Environment:");
    println!("  TIDL_LOG            Tracing filter, e.g. TIDL_LOG=tidl_abi=debug");
    println!("  TIDL_LOG_TREE       Render spans as a tree when set");
    println!();
    println!("Examples:");
    println!("  tidl generate shapes.json --out-dir=out");
    println!("  tidl generate shapes.json --dry-run");
    println!("  tidl demangle tidlS4_demo1_D1_2");
    println!("  tidl explain E9001");
}

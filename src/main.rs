mod cmds;
mod console;

use tracing_subscriber::EnvFilter;


fn usage() {
    eprintln!("Usage: cidrcalc IPADDRESS/CIDRPREFIX...");
    eprintln!("       cidrcalc -v|--validate TEXT...");
    eprintln!("       cidrcalc -s|--split IPADDRESS/CIDRPREFIX SUBNETCOUNT");
    eprintln!("       cidrcalc -e|--enumerate IPADDRESS/CIDRPREFIX [MAXCOUNT]");
    eprintln!("       cidrcalc -c|--contains IPADDRESS/CIDRPREFIX IPADDRESS...");
    eprintln!("       cidrcalc -o|--overlap IPADDRESS/CIDRPREFIX IPADDRESS/CIDRPREFIX");
    eprintln!("       cidrcalc -n|--next IPADDRESS/CIDRPREFIX IPADDRESS");
    eprintln!("       cidrcalc -g|--suggest IPADDRESS...");
    eprintln!("       cidrcalc -d|--derange IPADDRESS IPADDRESS");
    eprintln!();
    eprintln!("IPv4 and IPv6 are supported, but cannot be mixed within an invocation.");
    eprintln!("Set NO_COLOR to disable colors and RUST_LOG (e.g. RUST_LOG=debug) for diagnostics.");
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn do_main() -> i32 {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        usage();
        return 1;
    }

    match args[1].as_str() {
        "-v" | "--validate" => crate::cmds::validate::validate(&args),
        "-s" | "--split" => crate::cmds::split::split(&args),
        "-e" | "--enumerate" => crate::cmds::enumerate::enumerate(&args),
        "-c" | "--contains" => crate::cmds::contains::contains(&args),
        "-o" | "--overlap" => crate::cmds::contains::overlap(&args),
        "-n" | "--next" => crate::cmds::contains::next(&args),
        "-g" | "--suggest" => crate::cmds::suggest::suggest_networks(&args),
        "-d" | "--derange" => crate::cmds::derange::derange(&args),
        "--help" => {
            usage();
            0
        },
        _ => crate::cmds::show_net::show_net(&args),
    }
}

fn main() {
    init_logging();
    std::process::exit(do_main());
}

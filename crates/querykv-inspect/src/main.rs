use querykv_inspect::{Command, InspectConfig, open, run};

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });

    let config = InspectConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(2);
    });

    let dataset = open(&config).unwrap_or_else(|e| {
        eprintln!("failed to load {}: {e}", config.data.display());
        std::process::exit(1);
    });

    match run(&dataset, &command).and_then(|out| Ok(serde_json::to_string_pretty(&out)?)) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

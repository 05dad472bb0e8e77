//! Pangyo Survival line-based front end.
//!
//! A simple text interface over the headless game, designed for playing in
//! a terminal and for driving from scripts:
//!
//! ```bash
//! cargo run -p pangyo-cli -- --remote --save save.json
//! ```

use pangyo_core::headless::{HeadlessConfig, HeadlessGame, StagePrompt};
use pangyo_core::{Dictionary, Direction, Sender, Translator};
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = parse_config_from_args(&args);
    let translator = config
        .remote
        .then(|| Translator::new(pangyo_api::PangyoClient::from_env()));
    let dictionary = Dictionary::builtin();

    let mut game = HeadlessGame::new(config).await?;

    println!("=== 판교 생존기 ===");
    println!();
    println!("Commands:");
    println!("  #dict <검색어>      - Search the Pangyo dictionary");
    println!("  #lookup <단어>      - Magnifier lookup (needs the magnifier)");
    println!("  #translate <문장>   - Plain language to Pangyo-speak (remote only)");
    println!("  #to-plain <문장>    - Pangyo-speak to plain language (remote only)");
    println!("  #status             - Show stage, items and progress");
    println!("  #quit               - Exit");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print_new_lines(&mut game);
    print_prompt(&game);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('#') {
            if !run_command(command, &game, &dictionary, translator.as_ref()).await {
                break;
            }
            stdout.flush().ok();
            continue;
        }

        match game.prompt() {
            StagePrompt::Choices(choices) => match line.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => {
                    game.choose(n - 1).await?;
                }
                _ => {
                    println!("[ERROR] Pick a number between 1 and {}.", choices.len());
                    continue;
                }
            },
            StagePrompt::FreeText => {
                // "\n" in input stands for a line break in the composed text.
                let text = line.replace("\\n", "\n");
                game.say(&text).await?;
            }
            StagePrompt::Finished => break,
        }

        print_new_lines(&mut game);
        if let Some(item) = game.take_unlock() {
            println!("[ITEM] {} {}", item.icon, item.name);
        }
        if game.is_finished() {
            println!();
            println!("판교 생존 완료! 이제 당신은 진정한 판교인입니다! 🎊");
            break;
        }
        print_prompt(&game);
    }

    Ok(())
}

/// Run a `#` command. Returns `false` on quit.
async fn run_command(
    command: &str,
    game: &HeadlessGame,
    dictionary: &Dictionary,
    translator: Option<&Translator>,
) -> bool {
    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };
    match name {
        "quit" | "exit" => {
            println!("Goodbye!");
            return false;
        }
        "status" => {
            println!("[STATUS]");
            println!("  Stage: {}/4", game.current_stage());
            let items: Vec<&str> = game
                .session()
                .inventory()
                .items()
                .iter()
                .map(|i| i.name.as_str())
                .collect();
            println!("  Items: {}", if items.is_empty() { "-".to_string() } else { items.join(", ") });
            let done: Vec<String> = game
                .session()
                .progress()
                .completed()
                .map(|s| s.to_string())
                .collect();
            println!("  Completed: [{}]", done.join(", "));
        }
        "dict" => {
            let hits = dictionary.filter(rest, pangyo_core::ALL_CATEGORIES);
            if hits.is_empty() {
                println!("[DICT] No matches.");
            }
            for entry in hits {
                println!("[DICT] {} ({}): {}", entry.term, entry.category, entry.definition);
            }
        }
        "lookup" => {
            if !game.session().inventory().has(pangyo_core::items::MAGNIFIER_ID) {
                println!("[ERROR] You don't have the magnifier yet.");
            } else if let Some(entry) = dictionary.get(rest) {
                println!("[LOOKUP] {}: {}", entry.term, entry.definition);
                if !entry.example.is_empty() {
                    println!("[LOOKUP] 예: {}", entry.example);
                }
            } else {
                println!("[LOOKUP] '{rest}' is not in the dictionary.");
            }
        }
        "translate" | "to-plain" => {
            let Some(translator) = translator else {
                println!("[ERROR] Translation needs --remote.");
                return true;
            };
            let direction = if name == "translate" {
                Direction::ToPangyo
            } else {
                Direction::ToPlain
            };
            match translator.translate(rest, direction).await {
                Ok(text) => println!("[번역] {text}"),
                Err(e) => println!("[ERROR] {e}"),
            }
        }
        "help" => print_help(),
        _ => println!("[ERROR] Unknown command. Type #help for help."),
    }
    true
}

fn print_new_lines(game: &mut HeadlessGame) {
    for turn in game.drain_new_lines() {
        let who = match turn.sender {
            Sender::Npc => "사수",
            Sender::User => "나",
            Sender::EmployeeA => "직원A",
            Sender::EmployeeB => "직원B",
        };
        for (i, part) in turn.text.lines().enumerate() {
            if i == 0 {
                println!("{who} | {part}");
            } else {
                println!("{:width$} | {part}", "", width = who.chars().count() * 2);
            }
        }
    }
}

fn print_prompt(game: &HeadlessGame) {
    match game.prompt() {
        StagePrompt::Choices(choices) => {
            println!();
            for (i, choice) in choices.iter().enumerate() {
                println!("  {}. {}", i + 1, choice);
            }
            println!("(번호를 입력하세요)");
        }
        StagePrompt::FreeText => {
            println!();
            println!("(내용을 입력하세요; \\n 으로 줄바꿈)");
        }
        StagePrompt::Finished => {}
    }
}

fn parse_config_from_args(args: &[String]) -> HeadlessConfig {
    let mut config = HeadlessConfig::offline();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--remote" => config.remote = true,
            "--api-url" => {
                if let Some(url) = args.get(i + 1) {
                    config.base_url = Some(url.clone());
                    i += 1;
                }
            }
            "--save" => {
                if let Some(path) = args.get(i + 1) {
                    config.save_path = Some(path.into());
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Pangyo Survival");
    println!();
    println!("USAGE: pangyo [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --remote          Use the collaborator services (PANGYO_API_URL)");
    println!("  --api-url <URL>   Override the service base URL");
    println!("  --save <PATH>     Persist inventory and progress to a file");
    println!("  --help            Show this help");
}

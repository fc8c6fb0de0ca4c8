use dotenv::dotenv;
use finance_buddy::chat::SUGGESTED_QUESTIONS;
use finance_buddy::*;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("❌ {}: {}", notice.title, notice.description);
    } else {
        println!("✅ {}: {}", notice.title, notice.description);
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    dotenv().ok();
    env_logger::init();

    let client = ChatClient::from_env();
    let mut session = ChatSession::new();
    let mut store = FinanceStore::new();

    println!("💬 Finance Buddy chat ({})\n", client.endpoint());
    println!("🤖 {}\n", session.messages()[0].content);
    println!("Try one of:");
    for question in SUGGESTED_QUESTIONS {
        println!("  • {}", question);
    }
    println!("\nCommands: /upload <file.csv>, /clear, quit");
    println!("------------------------------------------------------------------");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let prompt = input.trim();

        if prompt.eq_ignore_ascii_case("quit") || prompt.eq_ignore_ascii_case("exit") {
            break;
        }
        if prompt.is_empty() {
            continue;
        }

        if let Some(path) = prompt.strip_prefix("/upload ") {
            match store.upload(Path::new(path.trim())) {
                Ok(notice) => {
                    print_notice(&notice);
                    let (name, rows) = store
                        .table()
                        .map(|t| (t.source_name().to_string(), t.len()))
                        .unwrap_or_default();
                    println!("\n🤖 {}\n", session.acknowledge_upload(&name, rows).content);
                }
                Err(e) => print_notice(&e.notice()),
            }
            continue;
        }
        if prompt == "/clear" {
            print_notice(&store.clear());
            continue;
        }

        println!();
        let result = client
            .send_with(&mut session, prompt, |token| {
                print!("{}", token);
                let _ = io::stdout().flush();
            })
            .await;
        println!("\n");

        match result {
            Ok(_) => println!("------------------------------------------------------------------"),
            Err(e) => print_notice(&e.notice()),
        }
    }

    Ok(())
}

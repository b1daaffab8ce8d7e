//! Interactive terminal client
//!
//! Talks to the inference backend directly, keeping its own local history.
//! Useful for poking at a model without running the relay service.

use std::io::{self, BufRead, Write};

use chat_core::{ChatMessage, Config};
use log::error;
use ollama_client::api::models::{ChatRequest, GenerationOptions};
use ollama_client::{OllamaClient, OllamaClientTrait};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::new();
    let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3:8b".to_string());
    let client = OllamaClient::new(config);

    match client.get_models().await {
        Ok(models) => println!("Available models: {}", models.join(", ")),
        Err(e) => error!("Could not list models: {e}"),
    }

    let mut history: Vec<ChatMessage> = Vec::new();

    let stdin = io::stdin();
    println!("Enter your prompt for {model} (type 'exit' to quit):");
    loop {
        print!("> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = input.trim();
        if input == "exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        history.push(ChatMessage::user(input));

        let request = ChatRequest {
            model: model.clone(),
            messages: history.clone(),
            stream: false,
            options: Some(GenerationOptions::default()),
        };

        match client.chat_completion(request).await {
            Ok(reply) => {
                println!("Response: {}", reply.message.content);
                history.push(ChatMessage::assistant(reply.message.content));
            }
            Err(e) => {
                error!("Error sending request: {e}");
                // Failed turns are not remembered.
                history.pop();
            }
        }
    }

    println!("Exiting the chat client.");
}

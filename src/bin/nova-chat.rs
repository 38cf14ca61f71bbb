//! Interactive terminal client for the Nova conversational AI service.
//!
//! This binary provides a REPL that logs into a Nova backend and chats
//! with the bot, revealing each reply character by character.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage; the backend is taken from NOVA_BASE_URL
//! nova-chat
//!
//! # Point at a specific backend
//! nova-chat --base-url https://nova.example.com
//!
//! # Slow the reveal down to 80ms per character
//! nova-chat --reveal-ms 80
//!
//! # Disable colors (useful for piping output)
//! nova-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/stats` - Show session statistics
//! - `/config` - Show the current configuration
//! - `/logout` - Log out and discard the conversation
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use nova::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer,
    SEND_FAILURE_TEXT, SendOutcome, help_text, parse_command,
};
use nova::{AuthToken, Nova, SessionContext, SignupRequest, TracingLogger};

/// Main entry point for the nova-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("nova-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let mut client = Nova::with_options(config.base_url.clone(), Some(config.request_timeout))?
        .with_logger(Arc::new(TracingLogger));
    let mut context = SessionContext::new();
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling during a reveal
    let interrupted = Arc::new(AtomicBool::new(false));

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("Nova Ai");

    loop {
        if !context.is_authenticated() {
            match authenticate(&client, &mut rl, &mut renderer).await? {
                Some(token) => {
                    client.set_token(Some(token.clone()));
                    context.login(token);
                }
                None => {
                    println!("Goodbye!");
                    return Ok(());
                }
            }
        }

        // The chat surface mounts with a fresh, in-memory conversation;
        // leaving it discards the history.
        let mut session = ChatSession::new(client.clone(), config.clone());
        println!("\n👋 Welcome to Nova Ai");
        println!("Ask me anything! I'm here to help.");
        println!("Type /help for commands, /quit to exit\n");

        let logged_out = chat_loop(
            &mut session,
            &mut context,
            &config,
            &mut rl,
            &mut renderer,
            &interrupted,
        )
        .await?;
        client.set_token(None);
        if !logged_out {
            println!("Goodbye!");
            return Ok(());
        }
    }
}

/// Runs the chat surface until logout or quit.
///
/// Returns true after a logout (the caller re-runs authentication) and
/// false when the application should exit.
async fn chat_loop(
    session: &mut ChatSession<Nova>,
    context: &mut SessionContext,
    config: &ChatConfig,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
    interrupted: &AtomicBool,
) -> Result<bool, Box<dyn std::error::Error>> {
    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                // Check for slash commands
                if let Some(cmd) = parse_command(trimmed) {
                    match cmd {
                        ChatCommand::Quit => return Ok(false),
                        ChatCommand::Logout => {
                            context.logout();
                            renderer.print_info("Logged out.");
                            return Ok(true);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Stats => print_stats(session, context),
                        ChatCommand::ShowConfig => print_config(session, config),
                        ChatCommand::Invalid(message) => renderer.print_error(&message),
                    }
                    continue;
                }

                // Regular message - run one send cycle
                session.set_input(&line);
                match session.send_input().await {
                    SendOutcome::Sent { .. } => {
                        println!("Nova:");
                        session.drive_reveal(renderer, interrupted).await;
                    }
                    SendOutcome::Failed { .. } => {
                        renderer.print_error(SEND_FAILURE_TEXT);
                    }
                    SendOutcome::RejectedEmpty | SendOutcome::RejectedBusy => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                return Ok(false);
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                return Ok(false);
            }
        }
    }
}

/// Runs the login surface until a credential is obtained or the user
/// quits. Returns `None` when the application should exit.
async fn authenticate(
    client: &Nova,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
) -> Result<Option<AuthToken>, Box<dyn std::error::Error>> {
    renderer.print_info("Log in to continue (login, signup, or quit).");
    loop {
        let choice = match rl.readline("nova> ") {
            Ok(line) => line.trim().to_lowercase(),
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match choice.as_str() {
            "" => continue,
            "login" => {
                let Some(email) = prompt(rl, "Email: ")? else {
                    continue;
                };
                let Some(password) = prompt(rl, "Password: ")? else {
                    continue;
                };
                match client.login(&email, &password).await {
                    Ok(token) => {
                        renderer.print_info("Logged in.");
                        return Ok(Some(token));
                    }
                    Err(err) => renderer.print_error(&err.to_string()),
                }
            }
            "signup" => signup(client, rl, renderer).await?,
            "quit" | "exit" | "q" => return Ok(None),
            _ => renderer.print_error("Expected login, signup, or quit."),
        }
    }
}

/// Collects signup details and submits them.
async fn signup(
    client: &Nova,
    rl: &mut DefaultEditor,
    renderer: &mut PlainTextRenderer,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(username) = prompt(rl, "Username: ")? else {
        return Ok(());
    };
    let Some(email) = prompt(rl, "Email: ")? else {
        return Ok(());
    };
    let Some(password) = prompt(rl, "Password: ")? else {
        return Ok(());
    };
    let Some(confirm) = prompt(rl, "Confirm password: ")? else {
        return Ok(());
    };
    if password != confirm {
        renderer.print_error("Passwords do not match!");
        return Ok(());
    }
    let Some(use_case) = prompt(rl, "What will you use Nova for? ")? else {
        return Ok(());
    };
    let Some(experience) = prompt(rl, "Experience with AI assistants: ")? else {
        return Ok(());
    };

    let request = SignupRequest {
        username,
        email,
        password,
        use_case,
        experience,
    };
    match client.signup(&request).await {
        Ok(message) => renderer.print_info(&message),
        Err(err) => renderer.print_error(&err.to_string()),
    }
    Ok(())
}

/// Reads one line; `None` means the user abandoned the flow.
fn prompt(
    rl: &mut DefaultEditor,
    label: &str,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    match rl.readline(label) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!();
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_stats(session: &ChatSession<Nova>, context: &SessionContext) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Messages: {}", stats.message_count);
    match stats.conversation_id {
        Some(ref id) => println!("      Conversation: {}", id),
        None => println!("      Conversation: (not started)"),
    }
    println!(
        "      Send cycles: {} ({} failed)",
        stats.send_cycles, stats.failed_cycles
    );
    println!(
        "      Reveal pending: {}",
        if stats.reveal_pending { "yes" } else { "no" }
    );
    if let Some(claims) = context.token().and_then(|token| token.claims()) {
        if let Some(account) = claims.email.or(claims.sub) {
            println!("      Account: {}", account);
        }
        if let Some(exp) = claims.exp {
            println!("      Token expires: {} (unix)", exp);
        }
    }
}

fn print_config(session: &ChatSession<Nova>, config: &ChatConfig) {
    let stats = session.stats();
    println!("    Current Configuration:");
    match config.base_url {
        Some(ref url) => println!("      Base URL: {}", url),
        None => println!("      Base URL: (from NOVA_BASE_URL)"),
    }
    println!(
        "      Reveal interval: {} ms",
        stats.reveal_interval.as_millis()
    );
    println!(
        "      Request timeout: {} ms",
        stats.request_timeout.as_millis()
    );
    println!(
        "      Color output: {}",
        if config.use_color { "enabled" } else { "disabled" }
    );
}

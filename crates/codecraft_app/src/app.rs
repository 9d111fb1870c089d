use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use codecraft_core::{update, AppState, Effect, Msg, SessionState};
use codecraft_engine::{
    BackendConfig, ClientSettings, EngineConfig, EngineHandle, OutputDir, RelaySettings,
};
use craft_logging::craft_info;

use crate::args::Args;
use crate::config::{load_settings, save_settings};
use crate::effects::EffectRunner;
use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

pub fn run(args: Args) -> ExitCode {
    let settings = load_settings(&args.settings);
    let mut state = AppState::with_preferences(settings.dark_mode);

    if args.toggle_theme {
        let (_state, effects) = update(state, Msg::ThemeToggled);
        for effect in effects {
            if let Effect::PersistTheme { dark_mode } = effect {
                let mut updated = settings.clone();
                updated.dark_mode = dark_mode;
                save_settings(&args.settings, &updated);
                println!(
                    "Theme preference set to {}",
                    if dark_mode { "dark" } else { "light" }
                );
            }
        }
        return ExitCode::SUCCESS;
    }

    let prompt = match args.prompt.clone() {
        Some(prompt) => prompt,
        None => match read_prompt_line() {
            Some(prompt) => prompt,
            None => {
                eprintln!("Nothing to do: no site description given.");
                return ExitCode::FAILURE;
            }
        },
    };

    // A fresh key typed here is persisted through the normal effect path
    // once the runner exists.
    let mut freshly_entered_key = None;
    let backend = match args.relay.clone() {
        Some(endpoint) => BackendConfig::Relay(RelaySettings {
            endpoint,
            ..RelaySettings::default()
        }),
        None => {
            let stored_key = settings
                .api_key
                .clone()
                .or_else(|| std::env::var(API_KEY_ENV).ok())
                .filter(|key| !key.trim().is_empty());
            let api_key = match stored_key {
                Some(key) => key,
                None => match prompt_for_key("No API key configured.") {
                    Some(key) => {
                        freshly_entered_key = Some(key.clone());
                        key
                    }
                    None => {
                        eprintln!("An OpenRouter API key is required. Aborting.");
                        return ExitCode::FAILURE;
                    }
                },
            };
            let mut client = ClientSettings {
                api_key,
                stream: !args.no_stream,
                ..ClientSettings::default()
            };
            if let Some(model) = args.model.clone() {
                client.model = model;
            }
            BackendConfig::OpenRouter(client)
        }
    };

    let engine = EngineHandle::new(EngineConfig { backend });
    let mut runner = EffectRunner::new(
        engine,
        OutputDir::new(args.output_dir.clone()),
        args.settings.clone(),
        settings,
    );

    if let Some(key) = freshly_entered_key {
        state = drive(state, &mut runner, Msg::ApiKeySubmitted(key));
    }
    state = drive(state, &mut runner, Msg::PromptChanged(prompt));
    state = drive(state, &mut runner, Msg::StyleSelected(args.style.into()));
    state = drive(state, &mut runner, Msg::GenerateClicked);
    render_if_dirty(&mut state);

    if state.session() == SessionState::Idle {
        eprintln!("Nothing to do: the site description is empty.");
        return ExitCode::FAILURE;
    }

    while state.session().in_flight() {
        match runner.poll_event() {
            Some(msg) => state = drive(state, &mut runner, msg),
            None => thread::sleep(POLL_INTERVAL),
        }
        render_if_dirty(&mut state);
    }

    match state.session() {
        SessionState::Done => {
            state = drive(state, &mut runner, Msg::SaveRequested);
            render_if_dirty(&mut state);
            let view = state.view();
            match render::saved_line(&view) {
                Some(line) => {
                    println!("{line}");
                    craft_info!("Generation finished successfully");
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("The site was generated but could not be written to disk.");
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            let view = state.view();
            for line in render::failure_lines(&view) {
                eprintln!("{line}");
            }
            if view.needs_credential {
                if let Some(key) = prompt_for_key("The stored credential was rejected.") {
                    let _ = drive(state, &mut runner, Msg::ApiKeySubmitted(key));
                    eprintln!("Credential saved. Run again to retry.");
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Apply one message and every follow-up produced by its effects.
fn drive(mut state: AppState, runner: &mut EffectRunner, msg: Msg) -> AppState {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        queue.extend(runner.apply(effects));
    }
    state
}

fn render_if_dirty(state: &mut AppState) {
    if state.consume_dirty() {
        println!("{}", render::status_line(&state.view()));
    }
}

fn read_prompt_line() -> Option<String> {
    eprint!("Describe the website to generate: ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    let prompt = line.trim().to_string();
    if prompt.is_empty() {
        None
    } else {
        Some(prompt)
    }
}

fn prompt_for_key(reason: &str) -> Option<String> {
    eprint!("{reason} Enter your OpenRouter API key: ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    let key = line.trim().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

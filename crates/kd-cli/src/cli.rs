//! Interactive CLI
//!
//! A reedline REPL fronting the advisory core. The web app's tabs map to
//! commands: chat is the default input, `/doctor` is the crop doctor,
//! `/mandi` the market dashboard and `/guides` the offline library.

use std::sync::Arc;

use chrono::Local;
use kd_core::advisory::{
    self, Condition, MARKET_RATES, Severity, Trend, WEATHER_ALERTS, WEATHER_FORECAST,
};
use kd_core::diagnostic::{self, DiagnosticResult};
use kd_core::llm::InlineData;
use kd_core::session::{GREETING_MESSAGE_ID, KeyValueStore, relative_time_label};
use kd_core::{
    ChatManager, Config, GeminiClient, GuideLibrary, Language, Role, SqliteKvStore, translations,
};
use kd_core::guides::GuideCategory;
use kd_core::session::MemoryKvStore;
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Suggestion,
};
use tracing::error;

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/help", "Show available commands"),
    ("/exit", "Leave the assistant"),
    ("/quit", "Leave the assistant"),
    ("/new", "Start a new chat"),
    ("/chats", "List previous chats"),
    ("/open", "Open a chat by number"),
    ("/delete", "Delete a chat by number"),
    ("/history", "Show the current conversation"),
    ("/lang", "Switch language (en, ur, pa)"),
    ("/mandi", "Market rates and weather"),
    ("/doctor", "Diagnose a crop photo"),
    ("/symptoms", "Offline symptom checker"),
    ("/guides", "List offline guides"),
    ("/guide", "Read a guide by number"),
    ("/download", "Mark a guide as downloaded"),
];

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.to_vec(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if !line.starts_with('/') {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Custom prompt with colored styling
struct ColoredPrompt {
    style: Style,
}

impl ColoredPrompt {
    fn new() -> Self {
        Self {
            style: Color::Green.bold(),
        }
    }
}

impl Prompt for ColoredPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.style.paint("🌾 > ").to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(
        &self,
        _prompt_mode: reedline::PromptEditMode,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }
}

/// Run the interactive assistant
pub async fn run_cli(client: GeminiClient, config: Config) -> anyhow::Result<()> {
    let store: Arc<dyn KeyValueStore> = Arc::new(
        SqliteKvStore::new(&config.storage.db_path)
            .map_err(|e| anyhow::anyhow!("Failed to open storage: {}", e))?,
    );

    let mut manager = ChatManager::new(
        store.clone(),
        Arc::new(client.clone()),
        config.app.language,
    );
    manager.initialize();

    let mut guides = GuideLibrary::new(store);
    let online = !config.app.offline;

    print_welcome(manager.language(), online);

    // Setup keybindings
    let mut keybindings = default_keybindings();

    // Trigger completion on '/' key
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(40))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = ColoredPrompt::new();

    loop {
        let signal = line_editor.read_line(&prompt);

        match signal {
            Ok(Signal::Success(line)) => {
                let input = line.trim();

                if input.is_empty() {
                    continue;
                }

                if input.starts_with('/') {
                    if !handle_command(input, &mut manager, &mut guides, &client, online).await {
                        break;
                    }
                    continue;
                }

                chat_turn(&mut manager, input, online).await;
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("\n👋 Khuda Hafiz!\n");
                break;
            }
            Err(err) => {
                eprintln!("\n❌ {}\n", err);
                break;
            }
        }
    }

    Ok(())
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    // Tab key triggers completion
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    // Esc key clears/closes menus
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(
        KeyModifiers::CONTROL,
        KeyCode::Char('c'),
        ReedlineEvent::CtrlC,
    );
    keybindings.add_binding(
        KeyModifiers::CONTROL,
        KeyCode::Char('d'),
        ReedlineEvent::CtrlD,
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

/// Send one chat message and print whatever reply arrives.
///
/// A failed remote call leaves the question in the history with no reply and
/// no error banner; the details go to the log.
async fn chat_turn(manager: &mut ChatManager, input: &str, online: bool) {
    let t = translations(manager.language());

    if !online {
        println!("\n📵 {} - {}\n", t.offline_mode, t.connect_internet);
        return;
    }

    let before = manager
        .active_session()
        .map(|s| s.messages.len())
        .unwrap_or(0);

    println!("{}", Style::new().dimmed().paint("..."));
    manager.send_message(input).await;

    if let Some(session) = manager.active_session() {
        if session.messages.len() > before + 1 {
            if let Some(reply) = session.messages.last() {
                println!("\n🤖 {}\n", reply.text);
            }
        }
    }
}

/// Handle a slash command; returns false when the REPL should exit
async fn handle_command(
    input: &str,
    manager: &mut ChatManager,
    guides: &mut GuideLibrary,
    client: &GeminiClient,
    online: bool,
) -> bool {
    let mut tokens = input.split_whitespace();
    let command = tokens.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = tokens.collect();
    let t = translations(manager.language());

    match command.as_str() {
        "/exit" | "/quit" | "/q" => {
            println!("\n👋 Khuda Hafiz!\n");
            return false;
        }
        "/help" | "/?" => print_help(),
        "/new" => {
            manager.create_session();
            println!("\n✨ {}", t.new_chat);
            if let Some(session) = manager.active_session() {
                println!("🤖 {}\n", session.messages[0].text);
            }
        }
        "/chats" => print_sessions(manager),
        "/open" => match parse_index(args.first(), manager.sessions().len()) {
            Some(index) => {
                let id = manager.sessions()[index].id.clone();
                manager.select_session(&id);
                print_history(manager);
            }
            None => println!("\n❓ /open <1-{}>\n", manager.sessions().len()),
        },
        "/delete" => match parse_index(args.first(), manager.sessions().len()) {
            Some(index) => {
                let id = manager.sessions()[index].id.clone();
                manager.delete_session(&id);
                println!("\n🗑️  {}\n", t.delete_chat);
            }
            None => println!("\n❓ /delete <1-{}>\n", manager.sessions().len()),
        },
        "/history" => print_history(manager),
        "/lang" => match args.first().and_then(|tag| Language::parse(tag)) {
            Some(lang) => {
                manager.set_language(lang);
                let t = translations(lang);
                println!("\n🗣️  {}: {}\n", t.language_label, lang.display_name());
            }
            None => println!("\n❓ /lang <en|ur|pa>\n"),
        },
        "/mandi" => {
            if online {
                print_dashboard(manager.language());
            } else {
                println!("\n📵 {} - {}\n", t.offline_mode, t.connect_internet);
            }
        }
        "/doctor" => {
            if args.is_empty() {
                println!("\n❓ /doctor <image-path>\n");
            } else if online {
                run_doctor(client, &args.join(" "), manager.language()).await;
            } else {
                // Offline: point at the symptom checker instead
                println!("\n📵 {}", t.offline_diagnostic_title);
                println!("{}", t.offline_diagnostic_desc);
                println!("👉 /symptoms\n");
            }
        }
        "/symptoms" => print_symptoms(&args, manager.language()),
        "/guides" => print_guides(guides, manager.language()),
        "/guide" => match parse_index(args.first(), guides.guides().len()) {
            Some(index) => print_guide(guides, index, manager.language()),
            None => println!("\n❓ /guide <1-{}>\n", guides.guides().len()),
        },
        "/download" => match parse_index(args.first(), guides.guides().len()) {
            Some(index) => {
                let guide = &guides.guides()[index];
                let now_downloaded = guides.toggle_download(guide.id);
                let label = if now_downloaded { t.downloaded } else { t.download };
                println!("\n💾 {}: {}\n", guide.title.get(manager.language()), label);
            }
            None => println!("\n❓ /download <1-{}>\n", guides.guides().len()),
        },
        _ => {
            println!("\n❓ {} - /help\n", input);
        }
    }

    true
}

/// Parse a 1-based list index
fn parse_index(token: Option<&&str>, len: usize) -> Option<usize> {
    let index: usize = token?.parse().ok()?;
    if index >= 1 && index <= len {
        Some(index - 1)
    } else {
        None
    }
}

/// Print welcome banner
fn print_welcome(lang: Language, online: bool) {
    let t = translations(lang);
    let status = if online { t.online_mode } else { t.offline_mode };

    println!();
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║  🌾 {}", t.welcome);
    println!("║     {}", t.subtitle);
    println!("╠════════════════════════════════════════════════════════════╣");
    println!("║  📶 {}", status);
    println!("║  💬 {}", t.ask_anything);
    println!("║  ⌨️  /help /new /chats /mandi /doctor /guides /lang        ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
}

/// Print command list
fn print_help() {
    println!();
    println!("📖 Commands:");
    for (cmd, desc) in COMMANDS {
        println!("  {:<10} - {}", cmd, desc);
    }
    println!();
}

/// Print the session list, newest first
fn print_sessions(manager: &ChatManager) {
    let lang = manager.language();
    let t = translations(lang);
    let now = Local::now();

    println!();
    println!("🕑 {}:", t.chat_history);
    println!("{}", "─".repeat(60));

    if manager.sessions().is_empty() {
        println!("  {}", t.no_history);
    }

    let active_id = manager.active_session().map(|s| s.id.clone());
    for (i, session) in manager.sessions().iter().enumerate() {
        let marker = if Some(&session.id) == active_id.as_ref() {
            "▶"
        } else {
            " "
        };
        println!(
            "{} {}. {} ({})",
            marker,
            i + 1,
            session.title,
            relative_time_label(session.updated_at, now, lang)
        );
        println!("     {}", Style::new().dimmed().paint(&session.preview));
    }

    println!("{}", "─".repeat(60));
    println!();
}

/// Print the active conversation
fn print_history(manager: &ChatManager) {
    let Some(session) = manager.active_session() else {
        return;
    };

    println!();
    println!("📜 {}", session.title);
    println!("{}", "─".repeat(60));

    for msg in &session.messages {
        let icon = match msg.role {
            Role::User => "👤",
            _ => "🤖",
        };
        let time = msg.timestamp.with_timezone(&Local).format("%H:%M");
        println!("{} [{}] {}", icon, time, msg.text);
    }

    println!("{}", "─".repeat(60));
    println!();
}

fn condition_icon(condition: Condition) -> &'static str {
    match condition {
        Condition::Sunny => "☀️",
        Condition::Cloudy => "☁️",
        Condition::PartlyCloudy => "⛅",
        Condition::Rain => "🌧️",
        Condition::Storm => "⛈️",
    }
}

/// Print the market/weather dashboard
fn print_dashboard(lang: Language) {
    let t = translations(lang);
    let today = Local::now().date_naive();

    println!();
    println!("🌦️  {}", t.weather_forecast);
    println!("{}", "─".repeat(60));
    for day in WEATHER_FORECAST {
        println!(
            "  {:<10} {} {:<15} {}°/{}°  {} {}%  {} {} km/h",
            advisory::day_label_from(today, day.day_offset, lang),
            condition_icon(day.condition),
            t.condition_label(day.condition),
            day.temp_max,
            day.temp_min,
            t.humidity,
            day.humidity,
            t.wind,
            day.wind_speed,
        );
    }

    println!();
    for alert in WEATHER_ALERTS {
        let style = match alert.severity {
            Severity::High => Color::Red.bold(),
            Severity::Medium => Color::Yellow.bold(),
            Severity::Low => Style::new().dimmed(),
        };
        println!("  ⚠️  {}", style.paint(alert.message));
    }

    println!();
    println!("📈 {}", t.tab_market);
    println!("{}", "─".repeat(60));
    for rate in MARKET_RATES {
        let (arrow, style) = match rate.trend {
            Trend::Up => ("↑", Color::Green.bold()),
            Trend::Down => ("↓", Color::Red.bold()),
            Trend::Stable => ("→", Style::new().dimmed()),
        };
        println!(
            "  {:<20} {} {}  ({})",
            rate.crop,
            style.paint(arrow),
            rate.price,
            rate.location
        );
    }
    println!();
}

/// Diagnose a crop photo from a file path
async fn run_doctor(client: &GeminiClient, path: &str, lang: Language) {
    let t = translations(lang);

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("\n❌ {}: {}\n", path, e);
            return;
        }
    };

    let mime = if path.to_lowercase().ends_with(".png") {
        InlineData::MIME_TYPE_PNG
    } else {
        InlineData::MIME_TYPE_JPEG
    };
    let image = InlineData::from_bytes(mime, &bytes);

    println!("\n🔍 {}", t.analyzing);

    let parsed = match client.analyze_crop_image(&image.data, lang).await {
        Ok(raw) => diagnostic::parse_diagnostic(&raw),
        Err(e) => Err(e),
    };

    match parsed {
        Ok(result) => print_diagnosis(&result, lang),
        Err(e) => {
            error!("Crop diagnosis failed: {}", e);
            println!("\n❌ Could not analyze image. Please try a clearer photo.\n");
        }
    }
}

/// Render a diagnosis report
fn print_diagnosis(result: &DiagnosticResult, lang: Language) {
    let t = translations(lang);

    let severity_style = if result.is_severe() {
        Color::Red.bold()
    } else {
        Color::Green.bold()
    };

    println!();
    println!("📋 {}", t.disease_detected);
    println!("{}", "─".repeat(60));
    println!("  {}", Style::new().bold().paint(&result.disease));
    println!(
        "  {} | {}",
        result.crop_detected,
        severity_style.paint(&result.severity)
    );
    if result.confidence > 0.0 {
        println!("  {}: {:.0}%", t.confidence, result.confidence);
    }

    println!();
    println!("💧 {}", t.treatment);
    for (i, step) in result.treatment.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }

    println!();
    println!("🛡️  {}", t.prevention);
    for item in &result.prevention {
        println!("  • {}", item);
    }
    println!();
}

/// Offline symptom checker: crops, then symptoms, then advice
fn print_symptoms(args: &[&str], lang: Language) {
    let t = translations(lang);

    match args {
        [] => {
            println!("\n🩺 {}:", t.select_crop);
            for matcher in diagnostic::SYMPTOM_DATA {
                println!("  • {}", matcher.crop);
            }
            println!("👉 /symptoms <crop>\n");
        }
        [crop] => match diagnostic::find_crop(crop) {
            Some(matcher) => {
                println!("\n🩺 {} ({}):", t.select_symptom, matcher.crop);
                for symptom in matcher.symptoms {
                    println!("  [{}] {}", symptom.id, symptom.description.get(lang));
                }
                println!("👉 /symptoms {} <id>\n", matcher.crop.to_lowercase());
            }
            None => println!("\n❓ {}\n", t.select_crop),
        },
        [crop, id, ..] => match diagnostic::find_crop(crop).and_then(|m| m.find_symptom(id)) {
            Some(symptom) => {
                println!();
                println!("⚠️  {}: {}", t.possible_cause, symptom.possible_issue.get(lang));
                println!(
                    "➡️  {}: {}",
                    t.immediate_action,
                    symptom.preliminary_action.get(lang)
                );
                println!();
            }
            None => println!("\n❓ {}\n", t.select_symptom),
        },
    }
}

/// List the offline guides
fn print_guides(guides: &GuideLibrary, lang: Language) {
    let t = translations(lang);

    println!();
    println!("📚 {}:", t.tab_offline);
    println!("{}", "─".repeat(60));
    for (i, guide) in guides.guides().iter().enumerate() {
        let icon = match guide.category {
            GuideCategory::Calendar => "📄",
            _ => "📖",
        };
        let status = if guides.is_downloaded(guide.id) {
            format!("✅ {}", t.downloaded)
        } else {
            format!("⬇️  {}", t.download)
        };
        println!("  {}. {} {}  [{}]", i + 1, icon, guide.title.get(lang), status);
    }
    println!("👉 /guide <n>  |  /download <n>");
    println!();
}

/// Print one guide
fn print_guide(guides: &GuideLibrary, index: usize, lang: Language) {
    let guide = &guides.guides()[index];

    println!();
    println!("📖 {}", guide.title.get(lang));
    println!("{}", "─".repeat(60));
    println!("{}", guide.content.get(lang));
    println!();
}

// ============================================================================
// Non-interactive mode
// ============================================================================

/// One-shot mode: ask a single question and exit.
///
/// Uses a throwaway in-memory store so one-shot questions never pollute the
/// saved chat history.
///
/// # Example
/// ```bash
/// kissan-dost --ask "What fertilizer for wheat?"
/// ```
pub async fn run_ask(client: GeminiClient, config: Config, prompt: &str) -> anyhow::Result<()> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        eprintln!("Error: prompt is empty");
        std::process::exit(1);
    }
    if config.app.offline {
        eprintln!(
            "Error: {}",
            translations(config.app.language).connect_internet
        );
        std::process::exit(1);
    }

    let mut manager = ChatManager::new(
        Arc::new(MemoryKvStore::new()),
        Arc::new(client),
        config.app.language,
    );
    manager.initialize();
    manager.send_message(prompt).await;

    match manager.active_session().and_then(|s| s.messages.last()) {
        Some(reply) if reply.role == Role::Model && reply.id != GREETING_MESSAGE_ID => {
            println!("{}", reply.text);
            Ok(())
        }
        _ => {
            eprintln!("Error: no reply received");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_bounds() {
        let token = "2";
        assert_eq!(parse_index(Some(&token), 3), Some(1));

        let token = "1";
        assert_eq!(parse_index(Some(&token), 1), Some(0));

        let token = "0";
        assert_eq!(parse_index(Some(&token), 3), None);

        let token = "4";
        assert_eq!(parse_index(Some(&token), 3), None);

        let token = "abc";
        assert_eq!(parse_index(Some(&token), 3), None);

        assert_eq!(parse_index(None, 3), None);
    }

    #[test]
    fn test_commands_cover_all_tabs() {
        let names: Vec<&str> = COMMANDS.iter().map(|(cmd, _)| *cmd).collect();
        for cmd in ["/mandi", "/doctor", "/guides", "/lang", "/new"] {
            assert!(names.contains(&cmd), "missing {}", cmd);
        }
    }
}

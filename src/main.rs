use std::sync::Arc;

use time::macros::format_description;
use time::Date;
use tokio::io::{AsyncBufReadExt, BufReader};

use nutritrack::auth::dto::{LoginRequest, RegisterRequest};
use nutritrack::config::AppConfig;
use nutritrack::foodlog::query::date_key;
use nutritrack::goal::form::GoalForm;
use nutritrack::http::{ApiTransport, HttpClient};
use nutritrack::{progress, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "nutritrack=debug,reqwest=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(api = %config.api_base_url, "starting client");
    let api: Arc<dyn ApiTransport> = Arc::new(HttpClient::new(&config)?);

    println!("nutritrack - type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session: Option<Session> = None;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "login" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [email, password] => {
                    let request = LoginRequest {
                        email: (*email).to_string(),
                        password: (*password).to_string(),
                    };
                    match Session::login(api.clone(), &request).await {
                        Ok(s) => {
                            println!("welcome back, {}", display_name(&s));
                            session = Some(s);
                        }
                        Err(e) => println!("login failed: {e}"),
                    }
                }
                _ => println!("usage: login <email> <password>"),
            },
            "register" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                [name, email, password] => {
                    let request = RegisterRequest {
                        name: (*name).to_string(),
                        email: (*email).to_string(),
                        password: (*password).to_string(),
                    };
                    match Session::register(api.clone(), &request).await {
                        Ok(s) => {
                            println!("welcome, {}", display_name(&s));
                            session = Some(s);
                        }
                        Err(e) => println!("registration failed: {e}"),
                    }
                }
                _ => println!("usage: register <name> <email> <password>"),
            },
            "logout" => match session.take() {
                Some(s) => {
                    s.logout();
                    println!("logged out");
                }
                None => println!("not logged in"),
            },
            _ => match session.as_ref() {
                None => println!("log in first (`login <email> <password>`)"),
                Some(s) => run_command(s, command, rest).await,
            },
        }
    }

    if let Some(s) = session {
        s.logout();
    }
    Ok(())
}

fn display_name(session: &Session) -> String {
    let user = session.user();
    if user.name.is_empty() {
        user.id.clone()
    } else {
        user.name.clone()
    }
}

async fn run_command(session: &Session, command: &str, rest: &str) {
    match command {
        "date" => {
            let format = format_description!("[year]-[month]-[day]");
            match Date::parse(rest.trim(), &format) {
                Ok(date) => match session.select_date(date).await {
                    Ok(_) => show_day(session).await,
                    Err(e) => println!("could not load {}: {e}", date_key(date)),
                },
                Err(_) => println!("usage: date YYYY-MM-DD"),
            }
        }
        "log" => match session.log_meal(rest).await {
            Ok(summary) => println!("{summary}"),
            Err(e) => println!("could not log meal: {e}"),
        },
        "goal" => match session.goal().await {
            Some(goal) => {
                println!("Calories: {} kcal", goal.calories);
                println!("Protein: {} g", goal.protein);
                println!("Carbs: {} g", goal.carbs);
                println!("Fats: {} g", goal.fat);
            }
            None => println!("No nutrition goal found. Please fill the goal form first."),
        },
        "setgoal" => match parse_goal_form(rest) {
            Ok(form) => match session.submit_goal(&form).await {
                Ok(plan) => println!(
                    "Goal saved: {} kcal, {}g protein, {}g carbs, {}g fat per day",
                    plan.calories, plan.protein, plan.carbs, plan.fat
                ),
                Err(e) => println!("could not save goal: {e}"),
            },
            Err(e) => println!("{e}"),
        },
        "show" => show_day(session).await,
        _ => println!("unknown command, type `help`"),
    }
}

async fn show_day(session: &Session) {
    let date = session.selected_date().await;
    let totals = session.current_totals().await;
    let goal = session.goal().await;

    println!("{}", date_key(date));
    match totals {
        None => println!("No food logged for this date."),
        Some(totals) => {
            println!("Calories: {} kcal", totals.calories);
            println!("Protein: {} g", totals.protein);
            println!("Carbs: {} g", totals.carbs);
            println!("Fats: {} g", totals.fat);

            let percent = progress::project(Some(&totals), goal.as_ref());
            println!(
                "Progress: calories {}% | protein {}% | carbs {}% | fat {}%",
                percent.calories, percent.protein, percent.carbs, percent.fat
            );
            println!(
                "Calories left: {}",
                progress::calories_left(Some(&totals), goal.as_ref())
            );
        }
    }
}

/// `setgoal` takes `key=value` pairs, e.g.
/// `setgoal age=30 weight=70 target=65 feet=5 inches=7 goal=lose rate=0.5`.
fn parse_goal_form(rest: &str) -> Result<GoalForm, String> {
    let mut form = GoalForm::default();
    let mut rate: Option<String> = None;
    for pair in rest.split_whitespace() {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
        let value = value.to_string();
        match key {
            "gender" => form.gender = value,
            "age" => form.age = value,
            "weight" => form.current_weight = value,
            "target" => form.target_weight = value,
            "feet" => form.height_feet = value,
            "inches" => form.height_inches = value,
            "activity" => form.activity_level = value,
            "goal" => form.goal_type = value,
            "rate" => rate = Some(value),
            _ => return Err(format!("unknown field `{key}`")),
        }
    }
    // The rate belongs to whichever direction was chosen, so it is
    // assigned after all pairs are read regardless of their order.
    if let Some(rate) = rate {
        if form.goal_type == "lose" {
            form.weekly_loss_rate = rate;
        } else {
            form.weight_gain_rate = rate;
        }
    }
    Ok(form)
}

fn print_help() {
    println!("commands:");
    println!("  register <name> <email> <password>");
    println!("  login <email> <password>");
    println!("  date YYYY-MM-DD      load totals for a day");
    println!("  log <meal text>      analyze and log a meal");
    println!("  show                 totals and progress for the selected day");
    println!("  goal                 show the current nutrition goal");
    println!("  setgoal key=value... submit the goal form (gender, age, weight,");
    println!("                       target, feet, inches, activity, goal, rate)");
    println!("  logout | quit");
}

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use student_console::api::HttpRecordsApi;
use student_console::commands::{Command, FormField, HELP};
use student_console::config::Config;
use student_console::console::{Console, ConsoleError};
use student_console::error::AppError;
use student_console::view::render;

enum Flow {
    Render,
    Quiet,
    Quit,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api = Arc::new(HttpRecordsApi::new(&config)?);
    info!("using backend at {}", api.base_url());

    let console = Console::new(api);
    console.start().await;
    println!("{}", render(&console.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        let flow = match execute(&console, command).await {
            Ok(flow) => flow,
            Err(e) => {
                // Failed requests already raised an alert.
                if !matches!(e, ConsoleError::Api(_)) {
                    eprintln!("{}", e);
                }
                debug!("command failed: {}", e);
                Flow::Render
            }
        };

        if let Some(alert) = console.take_alert() {
            eprintln!("! {}", alert);
        }

        match flow {
            Flow::Render => println!("{}", render(&console.snapshot())),
            Flow::Quiet => {}
            Flow::Quit => break,
        }
    }

    Ok(())
}

async fn execute(console: &Console, command: Command) -> Result<Flow, ConsoleError> {
    match command {
        Command::List => console.load_users().await,
        Command::Search(query) => console.search(query).await,
        Command::ClearSearch => console.clear_search().await,
        Command::AddStudent => console.open_new_student()?,
        Command::EditStudent(id) => console.open_edit_student(id)?,
        Command::DeleteStudent(id) => console.delete_student(id).await?,
        Command::ViewStudent(id) => console.view_student(id).await?,
        Command::Back => console.back_to_students(),
        Command::EnrollCourse => console.open_enroll_course()?,
        Command::EditCourse(id) => console.open_edit_course(id)?,
        Command::RemoveCourse(id) => console.delete_course(id).await?,
        Command::Set(FormField::Student(field), value) => console.set_student_field(field, value)?,
        Command::Set(FormField::Course(field), value) => console.set_course_field(field, value)?,
        Command::Save => save_open_dialog(console).await?,
        Command::Cancel => {
            console.cancel_course_dialog();
            console.cancel_student_dialog();
        }
        Command::ResetDemo => console.reset_demo_data().await?,
        Command::Show => {}
        Command::Help => {
            println!("{}", HELP);
            return Ok(Flow::Quiet);
        }
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Render)
}

/// The course dialog sits on top of the detail view, so it wins when both are open.
async fn save_open_dialog(console: &Console) -> Result<(), ConsoleError> {
    let state = console.snapshot();
    if state.course_dialog.is_some() {
        console.save_course().await
    } else if state.student_dialog.is_some() {
        console.save_student().await
    } else {
        Err(ConsoleError::NoDialogOpen)
    }
}

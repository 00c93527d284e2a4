mod cli;
mod command;
mod render;

use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};
use tracing::{info, warn};

use pottery_client::{ClientConfig, ClientError, Session};
use pottery_core::SyncReport;
use pottery_model::OperationId;
use pottery_observe::{LoggerConfig, logger_init};

use crate::{cli::Args, command::Command};

type Completion = (OperationId, Result<SyncReport, ClientError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 1) Logger
    let cfg = LoggerConfig::new(args.log_format, args.log_level.clone());
    logger_init(&cfg)?;

    // 2) Session
    let session = Session::connect(ClientConfig::new(args.base_url.clone()))?;
    for (field, value) in args.presets {
        session.set(field, value);
    }
    info!(base_url = %args.base_url, "session ready");

    // 3) Console
    println!("pottery console on {}; `help` lists commands", args.base_url);
    console(session).await
}

async fn console(session: Session) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: JoinSet<Completion> = JoinSet::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(cmd) => handle(&session, cmd, &mut in_flight).await,
                    Err(e) => eprintln!("{e:#}"),
                }
            }
            Some(done) = in_flight.join_next() => completed(&session, done),
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    drain(&session, &mut in_flight).await;
    Ok(())
}

async fn handle(session: &Session, cmd: Command, in_flight: &mut JoinSet<Completion>) {
    match cmd {
        Command::Empty | Command::Quit => {}
        Command::Help => println!("{}", command::HELP),
        Command::Ops => print!("{}", render::operations(session.catalog())),
        Command::Fields => print!("{}", render::fields(&session.fields().snapshot())),
        Command::Show => print!("{}", render::surfaces(&session.view())),
        Command::Set(field, value) => session.set(field, value),
        Command::Unset(field) => {
            session.fields().clear(field);
        }
        Command::Needs(id) => print!(
            "{}",
            render::needs(session.catalog(), &session.fields().snapshot(), id)
        ),
        Command::Wait => drain(session, in_flight).await,
        Command::Trigger(id) => match session.trigger(id) {
            Ok(pending) => {
                println!("{id} sent");
                in_flight.spawn(async move { (id, pending.wait().await) });
            }
            Err(e) => eprintln!("{id}: {e}"),
        },
    }
}

async fn drain(session: &Session, in_flight: &mut JoinSet<Completion>) {
    while let Some(done) = in_flight.join_next().await {
        completed(session, done);
    }
}

fn completed(session: &Session, done: Result<Completion, tokio::task::JoinError>) {
    match done {
        Ok((_, Ok(report))) => {
            print!("{}", render::surfaces(&session.view()));
            print!("{}", render::report(&report));
        }
        Ok((id, Err(e))) => eprintln!("{id}: {e}"),
        Err(e) => warn!(error = %e, "completion task failed"),
    }
}

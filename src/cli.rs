//! The `ask` command flow, kept out of `main.rs` so it can run against any
//! provider.

use std::path::{Path, PathBuf};

use crate::export::{ExportError, ScrollCard};
use crate::models::{Session, UserInput};
use crate::oracle::Oracle;

/// A finished reading and, when saving was requested, how the save went.
#[derive(Debug)]
pub struct Reading {
    pub session: Session,
    pub card: ScrollCard,
    pub saved: Option<Result<PathBuf, ExportError>>,
}

/// Run one submission through a fresh session.
///
/// Fails with the user-facing message when the session ends in `Error`. A
/// failed save does not fail the reading; it is reported in `saved`.
pub async fn ask(
    oracle: &Oracle,
    input: UserInput,
    save_dir: Option<&Path>,
) -> anyhow::Result<Reading> {
    let session = Session::new().submit(input.clone())?;
    let session = match oracle.divine(&input).await {
        Ok(result) => session.succeed(result)?,
        Err(e) => session.fail(e.to_string())?,
    };

    let Some(result) = session.result() else {
        let message = session.error_message().unwrap_or_default().to_string();
        anyhow::bail!(message);
    };
    let card = ScrollCard::new(&input, result);

    let saved = save_dir.map(|dir| {
        card.save(dir).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to save scroll");
        })
    });

    Ok(Reading {
        session,
        card,
        saved,
    })
}

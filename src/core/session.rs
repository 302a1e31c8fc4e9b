//! Workbench: one owner for form state, mode, launch URL and snapshot.
//!
//! Every input change goes through [`Workbench::reconcile`], which resolves
//! the active document, projects it into the launch URL and then mirrors the
//! mode state into the snapshot. Only states whose document parses are saved,
//! so the snapshot always holds the last valid blueprint.

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::cli::{AppContext, DecodeArgs, EditArgs, OutputFormat, PreviewArgs, StatusArgs, UrlArgs};
use crate::core::encode;
use crate::core::form::FormState;
use crate::core::launch::LaunchProjector;
use crate::core::mode::{ActiveDocument, Confirm, ModeState, Reconciler};
use crate::core::snapshot::{RestoreOutcome, SnapshotStore};

/// Snapshot of what the UI should show after a reconciliation.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub mode: &'static str,
    pub valid: bool,
    pub preview: String,
    pub launch_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Export of the active document was asked for while it does not parse.
#[derive(Debug, thiserror::Error)]
#[error("manual blueprint is not valid JSON: {0}")]
pub struct ExportError(pub String);

#[derive(Debug)]
pub struct Workbench {
    form: FormState,
    reconciler: Reconciler,
    projector: LaunchProjector,
    store: SnapshotStore,
    active: ActiveDocument,
}

impl Workbench {
    /// Restore any saved manual state (asking `confirm`) and reconcile once.
    #[instrument(skip_all)]
    pub fn open(
        form: FormState,
        store: SnapshotStore,
        projector: LaunchProjector,
        confirm: &mut dyn Confirm,
    ) -> Self {
        let mut reconciler = Reconciler::new();
        match store.restore(confirm) {
            RestoreOutcome::Accepted(content) => reconciler.restore_manual(content),
            RestoreOutcome::Declined => debug!("saved manual blueprint discarded"),
            RestoreOutcome::Empty => {}
        }

        // Placeholder; the first reconcile resolves the real document.
        let active = ActiveDocument::Manual(serde_json::Value::Null);
        let mut wb = Self { form, reconciler, projector, store, active };
        wb.reconcile();
        wb
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn mode(&self) -> &ModeState {
        self.reconciler.state()
    }

    pub fn active_document(&self) -> &ActiveDocument {
        &self.active
    }

    pub fn launch_url(&self) -> Option<&str> {
        self.projector.last_url()
    }

    /// Replace the form. A manual blueprint keeps precedence.
    pub fn set_form(&mut self, form: FormState) -> Reconciliation {
        self.form = form;
        self.reconcile()
    }

    /// Direct edit of the blueprint text.
    pub fn edit(&mut self, raw: impl Into<String>) -> Reconciliation {
        self.reconciler.edit(raw);
        self.reconcile()
    }

    /// Confirmed return to auto mode. Returns `None` when nothing was reset.
    pub fn reset(&mut self, confirm: &mut dyn Confirm) -> Option<Reconciliation> {
        if self.reconciler.reset(confirm) {
            Some(self.reconcile())
        } else {
            None
        }
    }

    /// Resolve, project, persist. Unparseable manual text is never saved.
    pub fn reconcile(&mut self) -> Reconciliation {
        self.active = self.reconciler.resolve_active_document(&self.form);

        if self.projector.project(&self.active).is_some() {
            if let Err(e) = self.store.save(self.reconciler.state()) {
                warn!("Failed to save blueprint state: {e}");
            }
        } else {
            debug!("invalid manual blueprint not saved");
        }

        self.view()
    }

    /// What the UI shows for the current state, without re-resolving.
    pub fn view(&self) -> Reconciliation {
        let error = match &self.active {
            ActiveDocument::Invalid { error, .. } => Some(error.clone()),
            _ => None,
        };

        Reconciliation {
            mode: self.reconciler.state().label(),
            valid: self.active.is_valid(),
            preview: self.reconciler.preview_text(&self.form),
            launch_url: self.projector.last_url().map(str::to_string),
            error,
        }
    }

    /// Active document as indented JSON, for copying.
    pub fn export_document(&self) -> Result<String, ExportError> {
        match &self.active {
            ActiveDocument::Invalid { error, .. } => Err(ExportError(error.clone())),
            doc => Ok(doc.to_pretty_json().unwrap_or_default()),
        }
    }

    /// Current launch URL, for copying.
    pub fn export_url(&self) -> Option<String> {
        self.projector.last_url().map(str::to_string)
    }
}

/// Open a workbench from CLI state.
fn open_workbench(form: FormState, ctx: &AppContext) -> Workbench {
    let mut confirm = ctx.restore_confirm();
    Workbench::open(
        form,
        ctx.snapshot_store(),
        LaunchProjector::new(ctx.config.base_url.clone()),
        &mut confirm,
    )
}

/// `wpbp url`
pub fn url_run(args: UrlArgs, ctx: &AppContext) -> Result<()> {
    let prefill = args.form.prefill();
    let form = args.form.resolve(&ctx.config);
    let wb = open_workbench(form, ctx);

    let Some(url) = wb.export_url() else {
        bail!(ExportError(invalid_reason(wb.active_document())));
    };

    println!("{url}");

    if prefill.is_some_and(|p| p.autostart()) && !ctx.quiet {
        eprintln!("Autostart requested: open the URL above to launch Playground");
    }

    if args.clipboard {
        crate::infra::clipboard::copy_to_clipboard(&url, ctx)?;
    }
    Ok(())
}

/// `wpbp preview`
pub fn preview_run(args: PreviewArgs, ctx: &AppContext) -> Result<()> {
    let form = args.form.resolve(&ctx.config);
    let wb = open_workbench(form, ctx);
    let view = wb.view();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&view).context("serialize preview")?);
        }
        OutputFormat::Text => print_preview(&view, ctx),
    }

    if args.clipboard {
        let text = wb.export_document()?;
        crate::infra::clipboard::copy_to_clipboard(&text, ctx)?;
    }
    Ok(())
}

/// `wpbp edit`
pub fn edit_run(args: EditArgs, ctx: &AppContext) -> Result<()> {
    let text = crate::infra::io::read_text_input(args.file.as_deref())?;
    let form = args.form.resolve(&ctx.config);

    if ctx.dry_run {
        let mut preview = Reconciler::new();
        preview.edit(text);
        let doc = preview.resolve_active_document(&form);
        if !ctx.quiet {
            println!("DRY RUN: would switch to manual mode (valid JSON: {})", doc.is_valid());
        }
        return Ok(());
    }

    let mut wb = open_workbench(form, ctx);
    let view = wb.edit(text.clone());

    if view.error.is_some() {
        let report = crate::infra::diagnostics::invalid_json_report(&text);
        eprintln!("{report:?}");
        if let Some(url) = &view.launch_url {
            eprintln!("Launch URL left unchanged: {url}");
        }
        return Ok(());
    }

    if !ctx.quiet {
        eprintln!("{} manual blueprint saved", "✓".green());
    }
    if let Some(url) = view.launch_url {
        println!("{url}");
    }
    Ok(())
}

/// `wpbp reset`
pub fn reset_run(ctx: &AppContext) -> Result<()> {
    let mut wb = open_workbench(ctx.config.defaults.to_form(), ctx);

    if !wb.mode().is_manual_mode() {
        if !ctx.quiet {
            println!("Already in auto mode; nothing to reset");
        }
        return Ok(());
    }

    let mut confirm = ctx.reset_confirm();
    match wb.reset(&mut confirm) {
        Some(_) => {
            if !ctx.quiet {
                println!("{} back to auto mode", "✓".green());
            }
        }
        None => {
            if !ctx.quiet {
                println!("Reset cancelled; manual blueprint kept");
            }
        }
    }
    Ok(())
}

/// `wpbp status`: inspect the stored snapshot without touching it.
pub fn status_run(args: StatusArgs, ctx: &AppContext) -> Result<()> {
    let store = ctx.snapshot_store();
    let record = store.load().context("Failed to read blueprint snapshot")?;

    if matches!(args.format, OutputFormat::Json) {
        println!("{}", serde_json::to_string(&record).context("serialize snapshot")?);
        return Ok(());
    }

    println!("Snapshot: {}", store.path().display());
    match record {
        None => println!("Mode: auto (no snapshot)"),
        Some(rec) => {
            let mode = if rec.is_manual_mode { "manual" } else { "auto" };
            println!("Mode: {mode}");
            if let Some(at) = rec.captured_at() {
                println!("Saved: {}", at.to_rfc3339());
            }
        }
    }
    Ok(())
}

/// `wpbp decode`
pub fn decode_run(args: DecodeArgs, _ctx: &AppContext) -> Result<()> {
    let text = encode::decode(encode::fragment_of(&args.input)).context("Failed to decode fragment")?;
    let pretty = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or(text);
    println!("{pretty}");
    Ok(())
}

fn print_preview(view: &Reconciliation, ctx: &AppContext) {
    let badge = if view.mode == "manual" { "✏️  manual edit" } else { "💡 live preview" };
    if ctx.no_color {
        println!("[{badge}]");
    } else if view.mode == "manual" {
        println!("[{}]", badge.yellow());
    } else {
        println!("[{}]", badge.cyan());
    }

    println!("{}", view.preview);

    if let Some(err) = &view.error {
        eprintln!("{} {err}", "invalid JSON:".red());
    }
    match &view.launch_url {
        Some(url) => println!("\n{url}"),
        None => println!("\n(no launch URL)"),
    }
}

fn invalid_reason(doc: &ActiveDocument) -> String {
    match doc {
        ActiveDocument::Invalid { error, .. } => error.clone(),
        _ => "no launch URL available".to_string(),
    }
}

//! Pretty diagnostic and tree rendering using ariadne.
//!
//! Converts the explorer's [`Diagnostic`] type into ariadne [`Report`]s for
//! coloured terminal output. Falls back to structured JSON when the output is
//! piped or when the user explicitly requests it.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use dx_explorer_core::{StepKind, WalkStep};
use dx_explorer_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured terminal output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or pick from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            // Default: pretty for interactive terminals, JSON for pipes
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Best-effort character range in the response body for a diagnostic's key.
///
/// Keys are `class.name`; the first quoted occurrence of the name is taken.
/// Offsets count chars, which is what ariadne indexes spans by.
fn locate(source: &str, diag: &Diagnostic) -> Option<std::ops::Range<usize>> {
    let key = diag.path.as_deref()?;
    let name = key.rsplit_once('.').map_or(key, |(_, name)| name);
    let needle = format!("\"{name}\"");
    let byte = source.find(&needle)?;
    let start = source[..byte].chars().count();
    Some(start..start + needle.chars().count())
}

/// `k=v` pairs from the diagnostic's context, for a note line.
fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|ctx| !ctx.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Render a slice of diagnostics in pretty (ariadne) format to stderr.
///
/// Diagnostics whose key can be found in the source are rendered with source
/// context; the rest are rendered as standalone messages.
pub(crate) fn render_diagnostics_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default()
        .with_compact(false)
        .with_color(io::stderr().is_terminal());
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        if let Some(span) = locate(source, diag) {
            let mut builder = Report::build(report_kind(&diag.severity), (filename, span.clone()))
                .with_code(diag.id.as_ref())
                .with_message(&diag.message)
                .with_config(config);

            builder = builder.with_label(
                Label::new((filename, span))
                    .with_message(make_label_message(diag))
                    .with_color(severity_color(&diag.severity)),
            );

            if let Some(note) = context_note(diag) {
                builder = builder.with_note(note);
            }

            if let Some(explanation) = diag.explain() {
                builder = builder.with_help(explanation);
            }

            builder.finish().eprint(&mut cache).ok();
        } else {
            let kind_str = match diag.severity {
                Severity::Error => "error",
                Severity::Warn => "warning",
                Severity::Info => "info",
                _ => "diagnostic",
            };
            eprintln!(
                "{}[{}]: {}",
                kind_str.fg(severity_color(&diag.severity)),
                diag.id,
                diag.message
            );
            if let Some(path) = &diag.path {
                eprintln!("  --> {path}");
            }
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

/// Label text: the component key when present, otherwise the message.
fn make_label_message(diag: &Diagnostic) -> String {
    match &diag.path {
        Some(path) => path.clone(),
        None => diag.message.clone(),
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Render diagnostics as a JSON array to stdout.
pub(crate) fn render_diagnostics_json(diagnostics: &[Diagnostic]) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(diagnostics)?);
    Ok(())
}

// ── Unified entry point ─────────────────────────────────────────────────

/// Render diagnostics in the given format.
///
/// - `Pretty` → coloured output to stderr.
/// - `Json`   → JSON array to stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) -> serde_json::Result<()> {
    match format {
        Format::Pretty => {
            render_diagnostics_pretty(source, filename, diagnostics);
            Ok(())
        }
        Format::Json => render_diagnostics_json(diagnostics),
    }
}

// ── Component tree ──────────────────────────────────────────────────────

/// Print a reference-following walk as an indented outline to stdout.
///
/// Broken nodes are flagged in red; missing targets and cycles are shown
/// where the reference would have been expanded.
pub(crate) fn print_tree(steps: &[WalkStep<'_>]) {
    for step in steps {
        let indent = "  ".repeat(step.depth);
        let c = step.component;
        match step.kind {
            StepKind::Node => match c.broken_reason() {
                Some(reason) => println!(
                    "{indent}{} {}",
                    c.debug_string,
                    format!("(broken: {reason})").fg(Color::Red)
                ),
                None if c.is_required => println!("{indent}{} *", c.debug_string),
                None => println!("{indent}{}", c.debug_string),
            },
            StepKind::MissingTarget => println!(
                "{indent}{}",
                format!("<missing {}>", c.key).fg(Color::Yellow)
            ),
            StepKind::Cycle => println!(
                "{indent}{}",
                format!("<cycle back to {}>", c.key).fg(Color::Yellow)
            ),
        }
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning/info counts.
///
/// Example: `2 errors, 1 warning, 0 info`
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Warn => warnings += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }

    if errors + warnings + infos == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Blue)));
    }
    eprintln!("{}", parts.join(", "));
}

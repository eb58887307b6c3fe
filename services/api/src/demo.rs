use crate::infra::build_report_service;
use aquasentra::error::AppError;
use aquasentra::reports::{HazardReport, Principal, ReportServiceError, ReportSubmission, Role};
use chrono::SecondsFormat;
use clap::Args;
use serde_json::json;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reject the first report instead of approving it.
    #[arg(long)]
    pub(crate) reject: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (service, repository) = build_report_service();
    let citizen = Principal::new("demo-citizen", Role::Citizen);
    let verifier = Principal::new("demo-verifier", Role::Verifier);

    println!("Hazard reporting demo");

    println!("\nSubmissions");
    let mut submitted = Vec::new();
    for submission in demo_submissions() {
        match service.submit(&citizen, submission) {
            Ok(report) => {
                render_report(&report);
                submitted.push(report);
            }
            Err(err) => println!("- rejected: {err}"),
        }
    }

    println!("\nCitizen asks for the moderation queue");
    match service.list_pending(&citizen) {
        Ok(reports) => println!("- unexpectedly returned {} reports", reports.len()),
        Err(err) => println!("- {err}"),
    }

    println!("\nVerifier moderation queue");
    for report in service.list_pending(&verifier)? {
        render_report(&report);
    }

    let Some(first) = submitted.first() else {
        return Ok(());
    };
    let decision = if args.reject { "rejected" } else { "approved" };

    println!("\nDecisions");
    match service.decide(&verifier, &first.id, decision) {
        Ok(report) => println!("- {} -> {}", report.id, report.status.label()),
        Err(err) => println!("- {err}"),
    }
    match service.decide(&verifier, &first.id, "rejected") {
        Ok(report) => println!("- {} -> {} (unexpected)", report.id, report.status.label()),
        Err(ReportServiceError::Conflict { id, status }) => {
            println!("- {id} already processed, stays {}", status.label())
        }
        Err(err) => println!("- {err}"),
    }

    println!("\nPublic feed");
    let approved = service.list_approved()?;
    if approved.is_empty() {
        println!("- no approved reports");
    }
    for report in &approved {
        render_report(report);
    }

    println!("\n{} reports stored", repository.len());
    Ok(())
}

fn demo_submissions() -> Vec<ReportSubmission> {
    vec![
        ReportSubmission {
            latitude: Some(json!(-1.2921)),
            longitude: Some(json!(36.8219)),
            address: Some(json!("Moi Avenue, Nairobi")),
            hazard_type: Some(json!("Flooding")),
            severity: Some(json!("high")),
            description: Some(json!("Road submerged after overnight rain")),
        },
        ReportSubmission {
            latitude: Some(json!(-1.2864)),
            longitude: Some(json!(36.8172)),
            address: Some(json!("Kenyatta Avenue, Nairobi")),
            hazard_type: Some(json!("Open manhole")),
            severity: Some(json!("medium")),
            description: None,
        },
        ReportSubmission {
            latitude: Some(json!(95.0)),
            longitude: Some(json!(36.8)),
            address: Some(json!("")),
            hazard_type: Some(json!("Fallen tree")),
            severity: Some(json!("severe")),
            description: None,
        },
    ]
}

fn render_report(report: &HazardReport) {
    println!(
        "- {} | {} | {} ({}) | {} | by {} at {}",
        report.id,
        report.details.hazard_type,
        report.details.address,
        report.details.severity.label(),
        report.status.label(),
        report.created_by,
        report.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
}


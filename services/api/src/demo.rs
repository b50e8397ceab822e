use crate::infra::{parse_scheme, read_listing_file, InMemoryListingRepository, InMemoryNotifier};
use chrono::Utc;
use clap::Args;
use closet_share::error::AppError;
use closet_share::marketplace::disputes::{
    DamageReport, Dispute, DisputeAction, DisputeId, DisputeReason, DisputeResolution,
};
use closet_share::marketplace::listings::{
    run_automated_checks, AutomatedChecks, CheckResult, Condition, ListingContent,
    ListingDetails, ListingReviewService, ListingStatus, MaintenanceInfo, ModerationChecklist,
    ModeratorDecisionInput, OwnerId, Photo, PhotoKind, PhotoPresentation, Pricing,
    QualityReport, QualityScorer, ReviewAction, ReviewPolicy, ReviewRules, ReviewServiceError,
    ReviewSettings, SafetyInfo, ScoringScheme,
};
use closet_share::marketplace::messaging::redact_pii;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Listing document (JSON) to score
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Point allocation to use: balanced (25/25/25/25) or weighted (40/30/20/10)
    #[arg(long, value_parser = parse_scheme)]
    pub(crate) scheme: Option<ScoringScheme>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Listing document (JSON) to check
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the check results as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Scoring scheme applied at submission (defaults to balanced)
    #[arg(long, value_parser = parse_scheme)]
    pub(crate) scheme: Option<ScoringScheme>,
    /// Require a complete moderator checklist and notes for every decision
    #[arg(long)]
    pub(crate) enforce_checklist: bool,
    /// Skip the messaging and dispute portion of the demo
    #[arg(long)]
    pub(crate) skip_extras: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let content = read_listing_file(&args.file)?;
    let report = QualityScorer::new(args.scheme.unwrap_or_default()).score(&content);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_quality_report(&report);
    }
    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let content = read_listing_file(&args.file)?;
    let checks = run_automated_checks(&content, &ReviewRules::default());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&checks)?);
        return Ok(());
    }

    render_checks(&checks);
    let routed = ListingStatus::Draft
        .transition(
            ReviewAction::Submit {
                checks_passed: checks.all_passed(),
            },
            &ReviewPolicy::default(),
        )
        .map_err(ReviewServiceError::from)?;
    println!("\nSubmission would route to: {}", routed.label());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        scheme,
        enforce_checklist,
        skip_extras,
    } = args;

    let settings = ReviewSettings {
        scheme: scheme.unwrap_or_default(),
        policy: ReviewPolicy {
            enforce_moderator_checklist: enforce_checklist,
            ..ReviewPolicy::default()
        },
        ..ReviewSettings::default()
    };

    println!("Listing review demo ({} scoring)", settings.scheme);
    let notifier = Arc::new(InMemoryNotifier::default());
    let service = ListingReviewService::new(
        Arc::new(InMemoryListingRepository::default()),
        notifier.clone(),
        settings,
    );

    let owner = OwnerId("lender-ada".to_string());
    let draft = service.create_draft(owner, rushed_listing())?;
    println!("- Draft {} created", draft.id.0);

    let first = service.submit_for_review(&draft.id)?;
    println!(
        "- First submission -> {} (quality {}/100)",
        first.status.label(),
        first.quality_score
    );
    render_checks(&first.checks);
    if !first.improvements.is_empty() {
        println!("  Suggestions:");
        for suggestion in &first.improvements {
            println!("    - {suggestion}");
        }
    }

    service.update_content(&draft.id, polished_listing())?;
    let second = service.submit_for_review(&draft.id)?;
    println!(
        "- Resubmission after edits -> {} (quality {}/100)",
        second.status.label(),
        second.quality_score
    );

    let approved = service.approve_listing(
        &draft.id,
        ModeratorDecisionInput {
            moderator_id: Some("mod-demo".to_string()),
            notes: "Photos and pricing check out".to_string(),
            checklist: ModerationChecklist {
                photos_meet_standards: true,
                description_accurate: true,
                pricing_reasonable: true,
                condition_verified: true,
                policy_compliant: true,
            },
        },
    )?;
    println!(
        "- Moderator decision -> {} (bookable: {})",
        approved.status.label(),
        approved.is_bookable()
    );
    println!(
        "  Public status payload:\n{}",
        serde_json::to_string_pretty(&approved.status_view())?
    );

    println!("  Owner notices:");
    for notice in notifier.notices() {
        let channels: Vec<String> = notice
            .channels
            .iter()
            .map(|channel| format!("{channel:?}"))
            .collect();
        println!("    - {} via {}", notice.template, channels.join(", "));
    }

    if skip_extras {
        return Ok(());
    }

    println!("\nRenter message screening");
    let message = "Love it! Can you hold it for me? Call 515-555-0142 or see www.mycloset.example";
    let redacted = redact_pii(message);
    println!("- Original: {message}");
    println!(
        "- Stored:   {} ({} redaction(s))",
        redacted.text,
        redacted.redactions.len()
    );

    println!("\nDamage dispute");
    let now = Utc::now();
    let mut dispute = Dispute::open(
        DisputeId("dsp-demo".to_string()),
        "bk-demo",
        approved.id.clone(),
        DisputeReason::Damage,
        Some(DamageReport {
            description: "Wine stain on the hem".to_string(),
            photo_urls: vec!["https://img.closet.example/stain.jpg".to_string()],
            estimated_repair_cost: Some(Decimal::new(25, 0)),
        }),
        Decimal::new(75, 0),
        now,
    );
    let steps = [
        DisputeAction::StartReview,
        DisputeAction::Resolve(DisputeResolution::ChargeDeposit {
            amount: Decimal::new(25, 0),
        }),
        DisputeAction::Close,
    ];
    for action in steps {
        match dispute.apply(action, now) {
            Ok(status) => println!("- Dispute {} -> {}", dispute.id.0, status.label()),
            Err(err) => {
                println!("- Dispute step refused: {err}");
                break;
            }
        }
    }

    Ok(())
}

fn render_quality_report(report: &QualityReport) {
    println!(
        "Quality score: {}/100 ({} scheme)",
        report.total_score, report.scheme
    );
    println!("- Photos: {}", report.breakdown.photos);
    println!("- Description: {}", report.breakdown.description);
    println!("- Condition: {}", report.breakdown.condition);
    println!("- Care/safety: {}", report.breakdown.maintenance);

    if report.improvements.is_empty() {
        println!("\nSuggestions: none");
    } else {
        println!("\nSuggestions");
        for suggestion in &report.improvements {
            println!("- {suggestion}");
        }
    }
}

fn check_line(name: &str, result: &CheckResult) {
    let mark = if result.passed { "PASS" } else { "FAIL" };
    println!("  [{mark}] {name}: {}", result.message);
}

fn render_checks(checks: &AutomatedChecks) {
    println!("  Automated checks:");
    check_line("photo count", &checks.photo_count);
    check_line("photo resolution", &checks.photo_quality.resolution);
    check_line("photo file size", &checks.photo_quality.file_size);
    check_line("photo lighting", &checks.photo_quality.lighting);
    check_line("photo background", &checks.photo_quality.background);
    let description = &checks.description_quality;
    let mark = if description.passed { "PASS" } else { "FAIL" };
    println!("  [{mark}] description: {}", description.message);
    check_line("pricing", &checks.pricing_validation);
}

fn demo_photo(kind: PhotoKind, index: usize) -> Photo {
    Photo {
        url: format!("https://img.closet.example/demo/{index}.jpg"),
        kind,
        width: Some(1080),
        height: Some(1440),
        file_size_bytes: Some(1_800_000),
    }
}

fn rushed_listing() -> ListingContent {
    ListingContent {
        details: ListingDetails {
            title: Some("Sequin mini dress".to_string()),
            description: Some("Worn once, so sparkly!".to_string()),
            condition: Some(Condition::Excellent),
            original_price: Some(180.0),
            ..ListingDetails::default()
        },
        photos: vec![
            demo_photo(PhotoKind::Front, 1),
            demo_photo(PhotoKind::Back, 2),
        ],
        pricing: Pricing {
            daily_rate: Some(35.0),
            ..Pricing::default()
        },
        ..ListingContent::default()
    }
}

fn polished_listing() -> ListingContent {
    ListingContent {
        details: ListingDetails {
            title: Some("Sequin mini dress".to_string()),
            description: Some(
                "Champagne sequin mini on a stretch mesh base with a silk-feel lining. \
                 Worn once to a wedding, no missing sequins or snags. Fits true to size."
                    .to_string(),
            ),
            category: Some("dresses".to_string()),
            brand: Some("Self-Portrait".to_string()),
            size: Some("UK 10".to_string()),
            color: Some("champagne".to_string()),
            condition: Some(Condition::Excellent),
            original_price: Some(180.0),
            care_instructions: Some("Specialist dry clean".to_string()),
            measurements: None,
        },
        photos: vec![
            demo_photo(PhotoKind::Front, 1),
            demo_photo(PhotoKind::Back, 2),
            demo_photo(PhotoKind::Detail, 3),
            demo_photo(PhotoKind::Other, 4),
            demo_photo(PhotoKind::Other, 5),
        ],
        presentation: PhotoPresentation {
            white_background: true,
            good_lighting: true,
            multiple_angles: true,
            well_pressed: false,
        },
        pricing: Pricing {
            daily_rate: Some(24.0),
            event_rate: Some(60.0),
            security_deposit: Some(75.0),
            ..Pricing::default()
        },
        maintenance: MaintenanceInfo {
            dry_cleaned: true,
            pressed: false,
            recently_cleaned: true,
        },
        safety_info: SafetyInfo {
            allergen_free: false,
            storage_method: Some("Hanging, breathable cover".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polished_listing_passes_every_check() {
        let checks = run_automated_checks(&polished_listing(), &ReviewRules::default());
        assert!(checks.all_passed(), "{:?}", checks.failed_checks());
    }

    #[test]
    fn rushed_listing_needs_changes() {
        let checks = run_automated_checks(&rushed_listing(), &ReviewRules::default());
        assert_eq!(
            checks.failed_checks(),
            vec!["photoCount", "descriptionQuality", "pricingValidation"]
        );
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs::default()).expect("demo completes");
        run_demo(DemoArgs {
            scheme: Some(ScoringScheme::Weighted),
            enforce_checklist: true,
            skip_extras: true,
        })
        .expect("demo completes with strict policy");
    }
}

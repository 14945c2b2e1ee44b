use crate::infra::{parse_grade, InMemoryAssessmentRepository};
use clap::Args;
use learning_compass::config::PaymentConfig;
use learning_compass::error::AppError;
use learning_compass::workflows::assessment::{
    Answer, AssessmentId, AssessmentResults, AssessmentService, AssessmentServiceError,
    NewAssessment, PaymentConfirmation, Requester, ResponseSubmission,
};
use learning_compass::workflows::questions::{
    Category, CategoryFamily, Grade, GradeBand, Question, QuestionBank, QuestionBankImporter,
};
use learning_compass::workflows::recommendation::{RecommendationRecord, RecommendationSource};
use learning_compass::workflows::report::RenderedReport;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Grade of the demo student (K, G1 .. G12)
    #[arg(long, value_parser = parse_grade, default_value = "G6")]
    pub(crate) grade: Grade,
    /// Learning style the demo student leans toward
    #[arg(long, value_parser = parse_category, default_value = "visual")]
    pub(crate) favor: Category,
    /// Identifier used for the demo student
    #[arg(long, default_value = "demo-student")]
    pub(crate) student: String,
    /// Directory to write the summary and detailed HTML reports into
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct QuestionImportArgs {
    /// Question bank CSV export (one row per option)
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).ok_or_else(|| format!("'{raw}' is not a known category"))
}

pub(crate) fn run_question_import(args: QuestionImportArgs) -> Result<(), AppError> {
    let QuestionImportArgs { csv } = args;
    let mut bank = QuestionBank::standard();
    let before = bank.len();

    let file = fs::File::open(&csv)?;
    let added = QuestionBankImporter::publish_into(file, &mut bank)?;

    println!(
        "Imported {added} question(s) from {} ({before} built in)",
        csv.display()
    );
    for band in GradeBand::ordered() {
        println!("- {}: {} questions", band.label(), bank.for_band(band).len());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        grade,
        favor,
        student,
        output_dir,
    } = args;

    println!("Learning Compass demo");
    let service = AssessmentService::new(
        Arc::new(InMemoryAssessmentRepository::default()),
        QuestionBank::standard(),
        PaymentConfig::default(),
    );

    let walkthrough = walk_assessment(&service, &student, grade, favor)?;

    render_results(&walkthrough.results);
    render_recommendations(&walkthrough.recommendations);

    println!(
        "\nDetailed report unlocked with receipt {} ({} {})",
        walkthrough.transaction_id, walkthrough.amount, walkthrough.currency
    );

    if let Some(dir) = output_dir {
        fs::create_dir_all(&dir)?;
        for report in [&walkthrough.summary, &walkthrough.detailed] {
            let path = dir.join(&report.file_name);
            fs::write(&path, &report.body)?;
            println!("- wrote {} report to {}", report.kind.as_str(), path.display());
        }
    } else {
        println!(
            "- {} and {} rendered ({} / {} bytes); pass --output-dir to save them",
            walkthrough.summary.file_name,
            walkthrough.detailed.file_name,
            walkthrough.summary.body.len(),
            walkthrough.detailed.body.len()
        );
    }

    Ok(())
}

struct Walkthrough {
    results: AssessmentResults,
    recommendations: RecommendationRecord,
    summary: RenderedReport,
    detailed: RenderedReport,
    transaction_id: String,
    amount: u32,
    currency: String,
}

fn walk_assessment(
    service: &AssessmentService<InMemoryAssessmentRepository>,
    student: &str,
    grade: Grade,
    favor: Category,
) -> Result<Walkthrough, AssessmentServiceError> {
    let requester = Requester::student(student);
    let assessment = service.create_assessment(
        &requester,
        NewAssessment {
            grade,
            student_id: None,
        },
    )?;
    println!(
        "- Started {} for {} ({}, {} band)",
        assessment.id,
        assessment.student_id,
        grade.label(),
        grade.band().label()
    );

    let questions = service.assessment_questions(&requester, &assessment.id)?;
    println!("- Answering {} questions", questions.len());
    for question in &questions {
        service.record_response(
            &requester,
            ResponseSubmission {
                assessment_id: assessment.id.clone(),
                question_id: question.id.clone(),
                answer: demo_answer(question, favor),
                response_time_secs: Some(8),
            },
        )?;
    }

    let results = service.complete(&requester, &assessment.id)?;
    let recommendations = service.recommendations(&requester, &assessment.id)?;
    let summary = service.summary_report(&requester, &assessment.id)?;

    if let Err(AssessmentServiceError::PaymentRequired { amount, currency, .. }) =
        service.detailed_report(&requester, &assessment.id)
    {
        println!("- Detailed report locked until payment of {amount} {currency}");
    }

    let parent = Requester::parent_of(student);
    let receipt = service.confirm_payment(
        &parent,
        &assessment.id,
        PaymentConfirmation {
            transaction_id: demo_transaction(&assessment.id),
        },
    )?;
    let detailed = service.detailed_report(&parent, &assessment.id)?;

    Ok(Walkthrough {
        results,
        recommendations,
        summary,
        detailed,
        transaction_id: receipt.transaction_id,
        amount: receipt.amount,
        currency: receipt.currency,
    })
}

/// Strong agreement on the favored style, moderate on cognitive items, mild elsewhere.
fn demo_answer(question: &Question, favor: Category) -> Answer {
    if question.options.is_empty() {
        return Answer::FreeText {
            text: "I enjoyed building a model bridge with my class.".to_string(),
        };
    }

    let position = if question.category == favor {
        question.options.len() - 1
    } else if question.category.family() == CategoryFamily::CognitiveStrength {
        question.options.len() / 2
    } else {
        1.min(question.options.len() - 1)
    };
    Answer::Choice {
        option_id: question.options[position].id.clone(),
    }
}

fn demo_transaction(assessment_id: &AssessmentId) -> String {
    format!("demo-{assessment_id}")
}

fn render_results(results: &AssessmentResults) {
    println!("\nResults for {}", results.student_id);
    for view in [
        results.scoring.learning_style.as_ref(),
        results.scoring.cognitive_strength.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
        println!(
            "- {}: {} (secondary: {})",
            view.family.label(),
            view.primary_label,
            view.secondary_label
        );
    }

    println!("Category means:");
    for score in &results.scoring.category_scores {
        println!(
            "  - {}: {:.1} over {} response(s)",
            score.label, score.mean, score.responses
        );
    }

    println!("Tips:");
    for tip in &results.tips {
        println!("  - {tip}");
    }

    let environment = &results.ideal_environment;
    println!(
        "Ideal environment: {} ({:.1}) | {} ({:.1})",
        environment.structure.description,
        environment.structure.score,
        environment.social.description,
        environment.social.score
    );
}

fn render_recommendations(record: &RecommendationRecord) {
    let source = match record.source {
        RecommendationSource::Tailored => "tailored",
        RecommendationSource::Default => "grade band defaults",
    };
    println!("\nRecommendations ({source})");
    println!("Learning path: {}", record.learning_path);
    for course in &record.courses {
        println!(
            "  - {} [{}] {} weeks, {}",
            course.name, course.subject, course.duration_weeks, course.difficulty_label
        );
    }
    if !record.career_affinities.is_empty() {
        println!("Career affinities: {}", record.career_affinities.join(", "));
    }
}

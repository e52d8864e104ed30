//! `school questions` command.

use super::table::format_date;
use crate::cli::QuestionsCommand;
use crate::context::ServiceContext;
use crate::forms::require_text;
use crate::questions::Question;

/// Execute a `questions` subcommand.
///
/// Everyone may ask and answer. Students may only delete their own
/// questions and only admins may delete someone else's answer.
///
/// # Errors
///
/// Returns an error string if the text is empty, the viewer may not
/// delete, or a backend call fails.
pub async fn run(ctx: &ServiceContext, command: &QuestionsCommand) -> Result<(), String> {
    match command {
        QuestionsCommand::List { course_id } => {
            let questions = load(ctx, course_id).await?;
            if questions.is_empty() {
                println!("No questions in course {course_id}.");
            }
            for q in &questions {
                println!("[{}] {}", q.id, q.content);
                println!("  asked by {} on {}", q.created_by_user_name, format_date(q.created_at));
                for a in &q.answers {
                    println!("    > [{}] {}: {}", a.id, a.created_by_user_name, a.content);
                }
            }
        }
        QuestionsCommand::Ask { course_id, text } => {
            ctx.session_state().require()?;
            let text = require_text("question", text).map_err(|e| e.to_string())?;
            let question = ctx
                .backend
                .ask_question(course_id, &text)
                .await
                .map_err(|e| format!("Failed to ask question: {e}"))?;
            println!("Asked question {}.", question.id);
        }
        QuestionsCommand::Delete { course_id, question_id } => {
            let state = ctx.session_state();
            let viewer = state.require()?;
            let question = find(ctx, course_id, question_id).await?;
            if !question.can_delete(viewer) {
                return Err("Students can only delete their own questions".to_string());
            }
            ctx.backend
                .delete_question(course_id, question_id)
                .await
                .map_err(|e| format!("Failed to delete question: {e}"))?;
            println!("Deleted question {question_id}.");
        }
        QuestionsCommand::Answer { course_id, question_id, text } => {
            ctx.session_state().require()?;
            let text = require_text("answer", text).map_err(|e| e.to_string())?;
            let answer = ctx
                .backend
                .answer_question(course_id, question_id, &text)
                .await
                .map_err(|e| format!("Failed to answer question: {e}"))?;
            println!("Posted answer {} to question {question_id}.", answer.id);
        }
        QuestionsCommand::DeleteAnswer { course_id, question_id, answer_id } => {
            let state = ctx.session_state();
            let viewer = state.require()?;
            let question = find(ctx, course_id, question_id).await?;
            let answer = question
                .find_answer(answer_id)
                .ok_or_else(|| format!("No answer {answer_id} on question {question_id}"))?;
            if !answer.can_delete(viewer) {
                return Err("Only admins can delete someone else's answer".to_string());
            }
            ctx.backend
                .delete_question_answer(course_id, question_id, answer_id)
                .await
                .map_err(|e| format!("Failed to delete answer: {e}"))?;
            println!("Deleted answer {answer_id}.");
        }
    }
    Ok(())
}

async fn load(ctx: &ServiceContext, course_id: &str) -> Result<Vec<Question>, String> {
    ctx.backend
        .course_questions(course_id)
        .await
        .map_err(|e| format!("Failed to load questions of {course_id}: {e}"))
}

async fn find(
    ctx: &ServiceContext,
    course_id: &str,
    question_id: &str,
) -> Result<Question, String> {
    load(ctx, course_id)
        .await?
        .into_iter()
        .find(|q| q.id == question_id)
        .ok_or_else(|| format!("No question {question_id} in course {course_id}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::ports::backend::testing::FakeBackend;
    use crate::questions::QuestionAnswer;
    use crate::session::{sample_user, UserType};

    fn context_as(fake: FakeBackend, user_type: UserType, name: &str) -> ServiceContext {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let settings = Settings { session_path: dir.join("session.json"), ..Settings::default() };
        let ctx = ServiceContext::with_backend(Box::new(fake), settings);
        ctx.session.save(&sample_user(user_type)).unwrap();
        ctx
    }

    fn seeded(author: &str) -> FakeBackend {
        let fake = FakeBackend::default();
        fake.questions.lock().unwrap().push(Question {
            id: "q1".into(),
            content: "When is the exam?".into(),
            created_at: 0,
            created_by_user_id: author.into(),
            created_by_user_name: "Someone".into(),
            answers: vec![QuestionAnswer {
                id: "a1".into(),
                question_id: "q1".into(),
                content: "Monday".into(),
                created_at: 0,
                created_by_user_id: "teacher".into(),
                created_by_user_name: "T".into(),
            }],
        });
        fake
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Student, "school_questions_blank_test");
        let command = QuestionsCommand::Ask { course_id: "c1".into(), text: "  ".into() };

        let err = run(&ctx, &command).await.unwrap_err();

        assert_eq!(err, "question must not be empty");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn student_deletes_only_own_question() {
        let command =
            QuestionsCommand::Delete { course_id: "c1".into(), question_id: "q1".into() };

        let ctx = context_as(seeded("other"), UserType::Student, "school_questions_other_test");
        let err = run(&ctx, &command).await.unwrap_err();
        assert!(err.contains("their own questions"));

        let fake = seeded("u-1");
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Student, "school_questions_own_test");
        run(&ctx, &command).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), ["course_questions c1", "delete_question c1 q1"]);
    }

    #[tokio::test]
    async fn admin_deletes_any_answer() {
        let fake = seeded("other");
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Admin, "school_questions_answer_test");
        let command = QuestionsCommand::DeleteAnswer {
            course_id: "c1".into(),
            question_id: "q1".into(),
            answer_id: "a1".into(),
        };

        run(&ctx, &command).await.unwrap();

        assert_eq!(calls.lock().unwrap().last().unwrap(), "delete_question_answer c1 q1 a1");
    }

    #[tokio::test]
    async fn answer_posts_trimmed_text() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Teacher, "school_questions_reply_test");
        let command = QuestionsCommand::Answer {
            course_id: "c1".into(),
            question_id: "q1".into(),
            text: " Monday ".into(),
        };

        run(&ctx, &command).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), ["answer_question c1 q1"]);
    }
}

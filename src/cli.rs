//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::board::Lane;
use crate::session::UserType;

/// Top-level CLI parser for `school`.
#[derive(Debug, Parser)]
#[command(name = "school", version, about = "School management from the terminal")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and save the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
        /// School the account belongs to.
        #[arg(long = "school")]
        school_id: String,
    },
    /// End the session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Personal to-do board.
    #[command(subcommand)]
    Todo(TodoCommand),
    /// Grades and final grade computation.
    #[command(subcommand)]
    Grades(GradesCommand),
    /// Tag management.
    #[command(subcommand)]
    Tags(TagsCommand),
    /// Courses and their members.
    #[command(subcommand)]
    Courses(CoursesCommand),
    /// Questions asked inside a course.
    #[command(subcommand)]
    Questions(QuestionsCommand),
    /// School announcements.
    #[command(subcommand)]
    Announcements(AnnouncementsCommand),
    /// User administration.
    #[command(subcommand)]
    Users(UsersCommand),
}

/// `school todo ...`
#[derive(Debug, Subcommand)]
pub enum TodoCommand {
    /// Show the board.
    List,
    /// Add a task to the not-started lane.
    Add {
        /// Task text.
        text: String,
    },
    /// Move a task to another lane.
    Move {
        /// Task id.
        id: String,
        /// Target lane: not-started, in-progress or done.
        lane: Lane,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
}

/// `school grades ...`
#[derive(Debug, Subcommand)]
pub enum GradesCommand {
    /// Your grades in every course.
    Mine,
    /// Every student's grades in a course.
    Course {
        /// Course id.
        course_id: String,
    },
    /// Record a grade.
    Add(AddGradeArgs),
    /// Delete a grade.
    Delete {
        /// Grade id.
        grade_id: String,
        /// Course the grade belongs to.
        #[arg(long = "course")]
        course_id: String,
    },
}

/// Arguments of `school grades add`.
#[derive(Debug, Args)]
pub struct AddGradeArgs {
    /// Course id.
    #[arg(long = "course")]
    pub course_id: String,
    /// Student id.
    #[arg(long = "student")]
    pub student_id: Option<String>,
    /// Points obtained.
    #[arg(long)]
    pub grade: f64,
    /// Points possible.
    #[arg(long)]
    pub out_of: f64,
    /// Weight in percent; 0 shares whatever weight is left over.
    #[arg(long, default_value_t = 0.0)]
    pub weight: f64,
    /// Record the grade without counting it towards the final grade.
    #[arg(long, conflicts_with = "weight")]
    pub excluded: bool,
}

/// `school tags ...`
#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List every tag.
    List,
    /// Create a tag.
    Create {
        /// Label.
        name: String,
        /// Palette colour.
        colour: String,
    },
    /// Rename or recolour a tag.
    Update {
        /// Tag id.
        id: String,
        /// New label.
        #[arg(long)]
        name: Option<String>,
        /// New colour.
        #[arg(long)]
        colour: Option<String>,
    },
    /// Delete a tag.
    Delete {
        /// Tag id.
        id: String,
    },
    /// Show the tags of a user.
    User {
        /// User id.
        user_id: String,
    },
    /// Set exactly which tags a user carries.
    Assign {
        /// User id.
        user_id: String,
        /// Tag ids the user should end up with.
        tag_ids: Vec<String>,
    },
}

/// `school courses ...`
#[derive(Debug, Subcommand)]
pub enum CoursesCommand {
    /// List your courses.
    List,
    /// Show one course.
    Show {
        /// Course id.
        course_id: String,
    },
    /// List the members of a course.
    Members {
        /// Course id.
        course_id: String,
    },
    /// Create a course.
    Create {
        /// Display name.
        #[arg(long)]
        name: String,
        /// First day, as YYYY-MM-DD.
        #[arg(long)]
        start: String,
        /// Last day, as YYYY-MM-DD.
        #[arg(long)]
        end: String,
    },
    /// Change a course's name or dates.
    Update {
        /// Course id.
        course_id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New first day, as YYYY-MM-DD.
        #[arg(long)]
        start: Option<String>,
        /// New last day, as YYYY-MM-DD.
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a course.
    Delete {
        /// Course id.
        course_id: String,
    },
    /// List school users that can still be added to a course.
    Candidates {
        /// Course id.
        course_id: String,
    },
    /// Add a user to a course.
    AddMember {
        /// Course id.
        course_id: String,
        /// User id.
        user_id: String,
    },
    /// Remove a user from a course.
    RemoveMember {
        /// Course id.
        course_id: String,
        /// User id.
        user_id: String,
    },
}

/// `school questions ...`
#[derive(Debug, Subcommand)]
pub enum QuestionsCommand {
    /// List a course's questions and their answers.
    List {
        /// Course id.
        #[arg(long = "course")]
        course_id: String,
    },
    /// Ask a question.
    Ask {
        /// Course id.
        #[arg(long = "course")]
        course_id: String,
        /// Question text.
        text: String,
    },
    /// Delete a question.
    Delete {
        /// Course id.
        #[arg(long = "course")]
        course_id: String,
        /// Question id.
        question_id: String,
    },
    /// Answer a question.
    Answer {
        /// Course id.
        #[arg(long = "course")]
        course_id: String,
        /// Question id.
        question_id: String,
        /// Answer text.
        text: String,
    },
    /// Delete an answer.
    DeleteAnswer {
        /// Course id.
        #[arg(long = "course")]
        course_id: String,
        /// Question id.
        question_id: String,
        /// Answer id.
        answer_id: String,
    },
}

/// `school announcements ...`
#[derive(Debug, Subcommand)]
pub enum AnnouncementsCommand {
    /// List announcements addressed to you.
    List,
    /// Publish an announcement.
    Create {
        /// Heading.
        #[arg(long)]
        title: String,
        /// Body text.
        #[arg(long)]
        content: String,
        /// Let readers reply.
        #[arg(long)]
        allow_answers: bool,
        /// Tag id to publish under; repeat for several.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete an announcement.
    Delete {
        /// Announcement id.
        id: String,
    },
    /// Reply to an announcement.
    Answer {
        /// Announcement id.
        id: String,
        /// Reply text.
        content: String,
    },
    /// Delete a reply.
    DeleteAnswer {
        /// Announcement id.
        id: String,
        /// Reply id.
        answer_id: String,
    },
}

/// `school users ...`
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Show a user's profile.
    Show {
        /// User id.
        user_id: String,
    },
    /// Create an account.
    Create {
        /// Given name.
        #[arg(long)]
        first_name: String,
        /// Family name.
        #[arg(long)]
        last_name: String,
        /// Login email.
        #[arg(long)]
        email: String,
        /// Contact phone number.
        #[arg(long, default_value = "")]
        phone: String,
        /// Role: admin, teacher or student.
        #[arg(long = "type", default_value = "student")]
        user_type: UserType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_todo_move_with_cli_lane_spelling() {
        let cli = Cli::parse_from(["school", "todo", "move", "t1", "in-progress"]);
        match cli.command {
            Command::Todo(TodoCommand::Move { id, lane }) => {
                assert_eq!(id, "t1");
                assert_eq!(lane, Lane::InProgress);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_excluded_grade() {
        let cli = Cli::parse_from([
            "school", "grades", "add", "--course", "c1", "--student", "s1", "--grade", "7",
            "--out-of", "10", "--excluded",
        ]);
        match cli.command {
            Command::Grades(GradesCommand::Add(args)) => {
                assert_eq!(args.course_id, "c1");
                assert!(args.excluded);
                assert!(args.weight.abs() < f64::EPSILON);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn excluded_conflicts_with_explicit_weight() {
        let result = Cli::try_parse_from([
            "school", "grades", "add", "--course", "c1", "--grade", "7", "--out-of", "10",
            "--weight", "20", "--excluded",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unknown_lane() {
        assert!(Cli::try_parse_from(["school", "todo", "move", "t1", "someday"]).is_err());
    }

    #[test]
    fn parses_user_type_option() {
        let cli = Cli::parse_from([
            "school", "users", "create", "--first-name", "Ada", "--last-name", "L", "--email",
            "a@b.c", "--type", "teacher",
        ]);
        assert!(matches!(
            cli.command,
            Command::Users(UsersCommand::Create { user_type: UserType::Teacher, .. })
        ));
    }

    #[test]
    fn parses_repeated_announcement_tags() {
        let cli = Cli::parse_from([
            "school", "announcements", "create", "--title", "Trip", "--content", "Friday",
            "--tag", "t1", "--tag", "t2",
        ]);
        match cli.command {
            Command::Announcements(AnnouncementsCommand::Create { tags, .. }) => {
                assert_eq!(tags, ["t1", "t2"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_partial_course_update() {
        let cli = Cli::parse_from(["school", "courses", "update", "c1", "--end", "2025-06-30"]);
        match cli.command {
            Command::Courses(CoursesCommand::Update { course_id, name, start, end }) => {
                assert_eq!(course_id, "c1");
                assert_eq!((name, start), (None, None));
                assert_eq!(end.as_deref(), Some("2025-06-30"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn question_answer_takes_course_option() {
        let cli = Cli::parse_from([
            "school", "questions", "answer", "--course", "c1", "q1", "On Monday",
        ]);
        match cli.command {
            Command::Questions(QuestionsCommand::Answer { course_id, question_id, text }) => {
                assert_eq!((course_id.as_str(), question_id.as_str()), ("c1", "q1"));
                assert_eq!(text, "On Monday");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

//! The `levelup student` commands.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};

use levelup_core::statistics::level;

use super::Context;
use crate::console::medal_line;

#[derive(Subcommand)]
pub enum StudentAction {
    /// Add a student
    Add { name: String },

    /// Show all students, highest XP first
    List,

    /// Remove a student and everything they own
    Remove { name: String },

    /// Set the weekly goal (0 restores the default of 10)
    Goal { name: String, goal: u32 },

    /// Clear the lifetime medal tally
    ResetMedals { name: String },

    /// Wipe progress and/or lists
    Reset {
        name: String,

        /// Clear XP, word history, goal log, streak and weekly progress
        #[arg(long)]
        progress: bool,

        /// Delete every list
        #[arg(long)]
        lists: bool,
    },

    /// Start a new week: weekly progress back to zero
    NewWeek { name: String },
}

pub fn execute(ctx: &Context, action: StudentAction) -> Result<()> {
    let mut data = ctx.load_data()?;

    match action {
        StudentAction::Add { name } => {
            let name = data.add_student(&name)?;
            println!("Added {name}.");
        }
        StudentAction::List => {
            if data.students.is_empty() {
                println!("No students yet. Add one with: levelup student add <name>");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec!["Rank", "Student", "Level", "XP", "Medals", "Week"]);
            for (rank, (name, s)) in data.leaderboard().into_iter().enumerate() {
                table.add_row(vec![
                    Cell::new(rank + 1),
                    Cell::new(format!("{} {name}", s.emoji)),
                    Cell::new(level(s.xp)),
                    Cell::new(s.xp),
                    Cell::new(medal_line(&s.medals)),
                    Cell::new(format!("{}/{}", s.weekly_progress, s.weekly_goal)),
                ]);
            }
            println!("{table}");
            return Ok(());
        }
        StudentAction::Remove { name } => {
            data.remove_student(&name)?;
            println!("Removed {name}.");
        }
        StudentAction::Goal { name, goal } => {
            let student = data.student_mut(&name)?;
            student.set_weekly_goal(goal);
            println!("{name}'s weekly goal is now {}.", student.weekly_goal);
        }
        StudentAction::ResetMedals { name } => {
            data.student_mut(&name)?.reset_medals();
            println!("Medals cleared for {name}.");
        }
        StudentAction::Reset {
            name,
            progress,
            lists,
        } => {
            if !progress && !lists {
                anyhow::bail!("nothing to reset: pass --progress and/or --lists");
            }
            let student = data.student_mut(&name)?;
            if progress {
                student.reset_progress();
                println!("Progress reset for {name}.");
            }
            if lists {
                student.reset_lists();
                println!("Lists deleted for {name}.");
            }
        }
        StudentAction::NewWeek { name } => {
            data.student_mut(&name)?.start_new_week();
            println!("New week started for {name}.");
        }
    }

    ctx.save_data(&data)
}

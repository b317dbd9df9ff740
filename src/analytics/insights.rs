//! Daily insight tips and the assistant context sentence

use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::Habit;

/// A short coaching tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub title: &'static str,
    pub body: &'static str,
}

const fn tip(title: &'static str, body: &'static str) -> Insight {
    Insight { title, body }
}

/// Tip catalogue; index 0 is for an empty collection and index 1 for a
/// collection that has never been logged
pub const DAILY_INSIGHTS: &[Insight] = &[
    tip("Welcome to HabitFlow!", "Create your first habit stream and start shaping your daily routines."),
    tip("Ready for Action?", "Log an entry whenever you complete a task. Small steps build big change."),
    tip("You're Crushing It!", "With 80% positive habits, you're building an incredible foundation. Keep it up!"),
    tip("Great Balance!", "You're mostly focused on positive routines. Try reducing one bad habit this week."),
    tip("Consistency is Key", "Logging every day, even once, strengthens the tracking habit."),
    tip("Momentum Builder", "Every logged action is a vote for the person you're becoming."),
    tip("Stack Your Wins", "Chain small habits together. Morning stretch, water, log. Build the sequence."),
    tip("Track, Don't Judge", "The goal is awareness. Notice patterns; adjust with kindness."),
    tip("One Habit at a Time", "Focus on one change until it sticks. Then add the next."),
    tip("Streaks Are Feedback", "A streak isn't pressure. It's proof you're showing up."),
    tip("Rest Counts Too", "Recovery days are part of the system. Log rest if it helps."),
    tip("Environment Shapes Behavior", "Make the good habit obvious and the bad one invisible."),
    tip("Start Tiny", "One push-up, one page, one minute. Tiny is sustainable."),
    tip("Identity Over Outcome", "You're not 'trying to read'. You're a reader. Act like one."),
    tip("Log Before You Judge", "Data first. See what you actually do before changing it."),
    tip("Good Days and Off Days", "Both are data. Look at the trend, not a single day."),
    tip("Habit Stacking Works", "After [current habit], I will [new habit]. Attach to existing cues."),
    tip("Reward the Process", "Celebrate the log, not just the outcome. Process is the habit."),
    tip("Remove Friction", "Make the good habit easier and the bad one harder."),
    tip("Design Your Day", "Schedule your key habits. Time blocking turns intentions into action."),
    tip("Accountability Helps", "Share a streak or goal with someone. Visibility increases commitment."),
    tip("Reflect Weekly", "Once a week, review your logs. What's working? What's not?"),
    tip("Sleep Fuels Habits", "Better sleep makes every habit easier. Protect your rest."),
    tip("Morning Anchors", "A consistent morning routine makes the rest of the day predictable."),
    tip("Evening Wind-Down", "Log and plan the next day. Closure reduces tomorrow's friction."),
    tip("Cues Matter", "Time, place, or event can trigger a habit. Choose cues you can't miss."),
    tip("Craving Drives the Loop", "Notice what you crave. Channel it toward the habit you want."),
    tip("Response Is the Habit", "The action you take after the cue is what you're building."),
    tip("Reward Completes the Loop", "Feel good after the habit. Your brain will want to repeat it."),
    tip("Break the Loop to Break the Habit", "Change the cue, make the response harder, or remove the reward."),
    tip("Replace, Don't Erase", "Swap a bad habit for a good one. Same cue, new response."),
    tip("Two-Minute Rule", "Scale habits down to two minutes. Start small to stay consistent."),
    tip("Don't Break the Chain", "One miss is a slip; two can become a slide. Get back quickly."),
    tip("Logging Is the Meta-Habit", "Tracking itself is a habit. You're already building it."),
    tip("Quantity Before Quality", "Early on, focus on showing up. Refine later."),
    tip("Habits Compound", "1% better daily is 37x in a year. Trust the curve."),
    tip("Identity Beats Goals", "Goals end; identity lasts. Become someone who does the thing."),
    tip("Environment Over Willpower", "Design your space so the right choice is the easy one."),
    tip("Track the Negative Too", "Awareness of bad habits is the first step to changing them."),
    tip("Celebrate the Log", "Completing the log is a win. Acknowledge it."),
    tip("One Thing at a Time", "Multitasking dilutes focus. One habit, full attention."),
    tip("Routine Beats Intensity", "Regular moderate effort beats occasional heroics."),
    tip("Sleep and Habits", "When you're rested, discipline feels easier. Prioritize sleep."),
    tip("Stress and Slip-Ups", "High stress makes habits harder. Be kind when you miss."),
    tip("Context Is Key", "Same habit in a new place? Re-anchor it. Context matters."),
    tip("Visual Cues", "Put your running shoes by the door. Make the cue impossible to ignore."),
    tip("Implementation Intentions", "When X happens, I will Y. Write it; it increases follow-through."),
    tip("Review Your Logs", "Patterns show up over time. Use data to adjust."),
    tip("Small Consistency", "Doing a little every day beats doing a lot sometimes."),
    tip("Habit Contract", "Write what you'll do and what happens if you don't. Sign it."),
    tip("Social Proof", "Join a group or partner up. Others' progress can motivate you."),
    tip("Temptation Bundling", "Only do the fun thing while doing the habit. Pair them."),
    tip("Track Streaks", "Streaks make progress visible. Protect them, but don't fear losing them."),
    tip("Forgiveness and Restart", "One bad day doesn't define you. Restart the next day."),
    tip("Clarity of Purpose", "Why does this habit matter? Write it. Revisit when motivation dips."),
    tip("Systems Over Goals", "Goals are outcomes; systems are processes. Build the system."),
    tip("Log Honestly", "The log is for you. Honest data leads to real change."),
    tip("Batch Similar Habits", "Group related habits (e.g. all health) to create routines."),
    tip("Reduce Choices", "Fewer decisions in the day leave energy for habits."),
    tip("End of Day Review", "Quick nightly review: What did I log? What's for tomorrow?"),
    tip("Progressive Overload", "Increment slowly. Add a rep, a page, a minute when it feels easy."),
    tip("Trigger Mapping", "List the triggers for bad habits. Then disrupt or replace them."),
    tip("Habit Scorecard", "List daily habits. Mark + neutral -. Awareness without judgment."),
    tip("Implementation Beats Intention", "Planning is useful, but doing is what changes you."),
    tip("Your Future Self", "Every log is a gift to your future self. Keep sending them."),
];

const ASSISTANT_PERSONA: &str = "You are the HabitFlow assistant, a friendly and knowledgeable coach \
inside a habit-tracking app. You help users with their habits, goals, consistency, and motivation. \
Be conversational, supportive, and concise.";

/// Pick the tip of the day
///
/// The rotation is keyed on days since the Unix epoch and never lands on the
/// two onboarding tips once the user has logged something.
pub fn daily_insight(habits: &[Habit], today: NaiveDate) -> Insight {
    if habits.is_empty() {
        return DAILY_INSIGHTS[0];
    }
    let total: u64 = habits.iter().map(|h| h.total_logs).sum();
    if total == 0 {
        return DAILY_INSIGHTS[1];
    }

    let days = today
        .signed_duration_since(NaiveDate::default())
        .num_days()
        .rem_euclid(DAILY_INSIGHTS.len() as i64) as usize;
    DAILY_INSIGHTS[days.max(2)]
}

/// Context sentence handed to a conversational assistant
pub fn assistant_context(habits: &[Habit]) -> String {
    if habits.is_empty() {
        return ASSISTANT_PERSONA.to_string();
    }
    let names: Vec<&str> = habits.iter().map(|h| h.name.as_str()).collect();
    let total: u64 = habits.iter().map(|h| h.total_logs).sum();
    format!(
        "{} The user currently has {} habit(s): {}. Total logs across all habits: {}. \
         You can reference these when giving advice.",
        ASSISTANT_PERSONA,
        habits.len(),
        names.join(", "),
        total
    )
}

//! Prompt construction shared by all provider adapters.

/// Fixed system instruction sent with every generation request.
pub const SYSTEM_INSTRUCTION: &str = "You are an assistant that writes git commit messages. \
Analyze the diff and reply with a single commit message following the Conventional Commits \
style: a type (feat, fix, docs, style, refactor, test, chore), an optional scope, and a short \
description in the imperative mood of at most 50 characters, followed by a longer body only \
when the change needs one. Reply with the commit message itself and nothing else.";

/// User-facing prompt wrapping the diff, for providers with a separate
/// system/user message split.
pub fn user_prompt(diff: &str) -> String {
    format!("Write a commit message for the following diff:\n\n{diff}")
}

/// Single-string prompt for providers without a system/user split.
pub fn combined_prompt(diff: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n\nDiff:\n{diff}\n\nCommit message:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_contains_diff() {
        let prompt = user_prompt("+added line");
        assert!(prompt.contains("+added line"));
    }

    #[test]
    fn test_combined_prompt_contains_instruction_and_diff() {
        let prompt = combined_prompt("+added line");
        assert!(prompt.contains("Conventional Commits"));
        assert!(prompt.contains("+added line"));
        assert!(prompt.ends_with("Commit message:"));
    }

    #[test]
    fn test_instruction_requests_imperative_mood() {
        assert!(SYSTEM_INSTRUCTION.contains("imperative"));
    }
}

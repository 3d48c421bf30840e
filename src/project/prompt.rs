//! Prompt templates for the two pipeline completions.

/// Short completion asking for the single best stack for the goal.
pub fn stack_selection_prompt(goal: &str) -> String {
    format!(
        "Given the project goal: '{goal}', what is the single best programming language \
         and framework or API for a full-stack web application? Be extremely concise and \
         provide only the name, e.g., 'Node.js with Express.js', 'Python with Flask', or \
         'Web Audio API with vanilla JavaScript'."
    )
}

/// Large completion asking for complete file contents in the `###` block
/// convention the parser consumes.
pub fn code_generation_prompt(goal: &str, stack: &str) -> String {
    format!(
        r#"You are an expert software developer.
Generate all the necessary full-stack code for a complete project with the goal: '{goal}'.
The project should be built using the following technology stack: {stack}.

Provide the full content for the main files, including a brief description of the project structure and how to run it.
Use a clear format for each file, such as:

### index.html
```html
```

### backend/server.js
```javascript
// JavaScript code here
```

### requirements.txt
```
# Dependencies here
```

Ensure all files are complete and runnable."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_prompt_names_the_goal() {
        let prompt = stack_selection_prompt("a pomodoro timer");
        assert!(prompt.contains("'a pomodoro timer'"));
        assert!(prompt.contains("Be extremely concise"));
    }

    #[test]
    fn test_code_prompt_shows_block_convention() {
        let prompt = code_generation_prompt("a pomodoro timer", "Python with Flask");
        assert!(prompt.contains("Python with Flask"));
        assert!(prompt.contains("### index.html"));
        assert!(prompt.contains("```html"));
    }
}

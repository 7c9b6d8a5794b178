//! Prompt templates for the description service.

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful Java documentation assistant.";

pub fn comment_prompt(role: &str, code: &str, suggestions: bool) -> String {
    let mut prompt = format!(
        "Generate a concise Javadoc comment for the following Java {role}. \
         Describe its purpose, parameters, and return value if applicable. \
         Do not include the original code in your response."
    );
    if suggestions {
        prompt.push_str(
            " If the code has an obvious weakness, end the comment with one line \
             starting with `TODO:` that suggests a concrete improvement.",
        );
    }
    prompt.push_str(&format!("\n\nCode:\n```java\n{code}\n```\n"));
    prompt
}

pub fn overview_prompt(structure_json: &str) -> String {
    format!(
        "Below is the extracted structure of a Java project as JSON: packages, \
         classes, their fields, methods and the project types each class depends on.\n\
         Write a Markdown document for a developer new to the project. Cover the \
         overall architecture, the responsibility of each package, the most \
         important classes and how they interact, and a short list of suggested \
         improvements.\n\n```json\n{structure_json}\n```\n"
    )
}

pub fn simplify_diagram_prompt(plantuml: &str) -> String {
    format!(
        "The following PlantUML class diagram is complete but too detailed to read. \
         Produce a simplified PlantUML diagram that keeps the packages, the central \
         classes and interfaces, and their inheritance and main usage relations. \
         Drop fields, trivial methods and helper classes. Reply with PlantUML only, \
         starting with @startuml and ending with @enduml.\n\n```plantuml\n{plantuml}\n```\n"
    )
}

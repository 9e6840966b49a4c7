//! Prompt templates for every pipeline. Templates are the only thing that
//! differs between the convenience wrappers on [`crate::TextGenerator`].

/// Review prompt for a single source file: a capped content excerpt plus
/// the structural analysis as JSON.
pub fn code_review(file: &str, excerpt: &str, analysis_json: &str) -> String {
    format!(
        r#"Please perform a professional code review of the following Python file.

File: {file}

Code content:
```python
{excerpt}
```

Structural analysis:
{analysis_json}

Review checklist:
1. Code quality assessment
2. Potential problems
3. Performance suggestions
4. Safety checks
5. Readability improvements
6. PEP 8 conformance
7. Concrete change suggestions

Reply in this format:
- ✅ Strengths
- ⚠️ Problems
- 🔧 Suggestions
- 📝 Concrete changes

This project performs wind load calculations, so pay particular attention to:
- Numerical accuracy
- Completeness of error handling
- Documentation coverage
- Engineering reliability"#
    )
}

/// Project-level summary prompt over the flagged subset of reviews.
pub fn review_summary(
    total_files: usize,
    files_with_issues: usize,
    total_functions: usize,
    total_classes: usize,
    flagged_json: &str,
) -> String {
    format!(
        r#"Please produce a project summary from these code review results.

Review overview:
- Files reviewed: {total_files}
- Files with issues: {files_with_issues}
- Total functions: {total_functions}
- Total classes: {total_classes}

Detailed findings:
{flagged_json}

Summary requirements:
1. Overall code quality assessment
2. Main problem categories
3. Priorities (high/medium/low)
4. Improvement roadmap
5. Best practice recommendations

Use a professional technical report format suitable for project managers."#
    )
}

/// Documentation prompt for one source file.
pub fn documentation(code: &str, doc_type: &str) -> String {
    format!(
        r#"Please write documentation for the following {doc_type} code.

Code:
```python
{code}
```

Requirements:
1. Brief description of the functionality
2. Parameter descriptions
3. Return value
4. Usage example
5. Caveats

Reply in Markdown format."#
    )
}

/// Project-overview prompt over the per-file documentation listing.
pub fn project_overview(module_info_json: &str) -> String {
    format!(
        r#"Please write an overview document for the following Python modules.

Module listing:
{module_info_json}

Project: wind load calculation tool

Requirements:
1. Overall project introduction
2. Module structure
3. Main features
4. Usage guide
5. Technical highlights

Use professional Markdown formatting."#
    )
}

/// Explain an engineering concept in a given context.
pub fn explain_concept(concept: &str, context: &str) -> String {
    format!(
        r#"Please explain the concept of '{concept}' in the field of {context}.

Requirements:
1. Basic definition
2. Calculation formula (if any)
3. Engineering applications
4. Relevant design codes
5. A practical example

Use clear language suitable for practicing engineers."#
    )
}

/// Prose calculation report from building parameters and computed results.
pub fn calculation_report(params_json: &str, results_json: &str, code_standard: &str) -> String {
    format!(
        r#"Please write a professional wind load calculation report.

Building parameters:
{params_json}

Calculation results:
{results_json}

Design code: {code_standard}

Report requirements:
1. Project summary
2. Calculation basis
3. Parameter descriptions
4. Calculation procedure
5. Result analysis
6. Conclusions and recommendations
7. Caveats

Use a professional technical report format with the necessary tables and data."#
    )
}

/// Answer a technical question, optionally grounded in provided context.
pub fn technical_question(question: &str, context: &str) -> String {
    if context.is_empty() {
        format!(
            r#"Please answer the following wind load engineering question.

Question:
{question}

Requirements:
1. A professional, accurate answer
2. References to the relevant design codes
3. The calculation approach
4. Engineering application advice"#
        )
    } else {
        format!(
            r#"Answer the technical question based on the following context.

Context:
{context}

Question:
{question}

Requirements:
1. Answer the core question accurately
2. Provide relevant formulas or code references
3. Give practical application advice
4. State any uncertainty explicitly"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_prompt_embeds_excerpt_and_analysis() {
        let prompt = code_review("src/calc.py", "def f(): pass", "{\"functions\": []}");
        assert!(prompt.contains("src/calc.py"));
        assert!(prompt.contains("def f(): pass"));
        assert!(prompt.contains("{\"functions\": []}"));
    }

    #[test]
    fn test_question_prompt_switches_on_context() {
        let with = technical_question("How is terrain category chosen?", "GB50009 table 8.2");
        assert!(with.contains("GB50009 table 8.2"));

        let without = technical_question("How is terrain category chosen?", "");
        assert!(!without.contains("Context:"));
    }
}

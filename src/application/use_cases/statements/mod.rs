pub mod generate_statements;
pub mod list_statements;
pub mod render_statement_pdf;

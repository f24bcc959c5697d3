//! Per-request chat context handed to a text provider.

/// Persona applied to every request. Answers stay on the two consumption taxes
/// introduced by the Brazilian tax reform.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert in Brazilian tax law. \
Answer questions about the IBS and the CBS based on the most recent information, \
clearly and objectively. Keep your answers focused on these taxes.";

/// A chat bound to one system instruction. Built fresh for each request and
/// never carries prior turns, so every prompt is answered in isolation.
#[derive(Debug, Clone, Copy)]
pub struct Conversation<'a> {
    system_instruction: &'a str,
}

impl<'a> Conversation<'a> {
    pub fn new(system_instruction: &'a str) -> Self {
        Self { system_instruction }
    }

    pub fn system_instruction(&self) -> &str {
        self.system_instruction
    }
}

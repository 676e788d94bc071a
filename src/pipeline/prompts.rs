//! Fixed prompts for the two external AI services.

/// Transcription instruction constraining the model to actually-spoken
/// words. Mitigation only; the validator screens whatever comes back.
pub const TRANSCRIPTION_PROMPT: &str = "Transcribe only the words actually spoken in the audio. \
If the audio is silent or contains no intelligible speech, return an empty transcript. \
Do not invent greetings, sign-offs, or filler phrases.";

/// System prompt for the clinical session summary.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant helping practitioners summarize \
one-on-one client sessions.
Analyze the transcript and provide:
1. A brief overview (2-3 sentences)
2. Key themes discussed
3. The client's emotional state and progress
4. Action items or homework assigned
5. Important insights or breakthroughs

Keep it professional, empathetic, and focused on practical value.
Format your response in clear sections with headers.";

/// Prefix for the user message carrying the transcript.
pub const SUMMARY_USER_PREFIX: &str = "Please summarize this session transcript:\n\n";

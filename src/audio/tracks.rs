use crate::model::tone::Tone;

const DARK_CASTLE: &str = "https://cdn.pixabay.com/download/audio/2023/08/03/audio_8041a87a2a.mp3";
const CINEMATIC_SUSPENSE: &str =
    "https://cdn.pixabay.com/download/audio/2022/01/27/audio_33c92b656b.mp3";
const FOR_THE_KING: &str = "https://cdn.pixabay.com/download/audio/2023/04/10/audio_14886b704c.mp3";
const LAST_GOODBYE: &str = "https://cdn.pixabay.com/download/audio/2022/09/16/audio_9855a73562.mp3";

/// Background track for a tone. Mysterious and calm share the ambient track.
pub fn track_for(tone: Tone) -> &'static str {
    match tone {
        Tone::Mysterious | Tone::Calm => DARK_CASTLE,
        Tone::Suspenseful => CINEMATIC_SUSPENSE,
        Tone::Action => FOR_THE_KING,
        Tone::Somber => LAST_GOODBYE,
    }
}

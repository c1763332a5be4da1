/// Sound-effect playback — fire-and-forget; callers discard failures.
///
/// The terminal offers exactly one audible channel, the bell.  Explosions
/// ring it; shoot and hit cues are accepted and dropped, since a ~12
/// shots/sec stream of BELs would be noise rather than feedback.

use std::io::Write;

use jet_shooter::entities::Sound;

pub fn play<W: Write>(out: &mut W, sound: Sound) -> std::io::Result<()> {
    match sound {
        Sound::Explosion => out.write_all(b"\x07"),
        Sound::Shoot | Sound::Hit => Ok(()),
    }
}

use super::*;

#[test]
fn new_buffer_is_dark_and_shaped() {
    let buf = FrameBuffer::new(4, 6);
    assert_eq!(buf.frame_count(), 4);
    assert_eq!(buf.channel_count(), 6);
    for frame in buf.frames() {
        assert_eq!(frame, &vec![0; 6]);
    }
    assert_eq!(buf.frame(4), None);
}

#[test]
fn put_rgb_clips_per_byte() {
    let mut buf = FrameBuffer::new(2, 4);
    buf.put_rgb(0, 0, Rgb8::new(1, 2, 3));
    buf.put_rgb(1, 2, Rgb8::new(7, 8, 9));
    buf.put_rgb(5, 0, Rgb8::WHITE);
    buf.put_rgb(0, usize::MAX, Rgb8::WHITE);

    assert_eq!(buf.frame(0), Some(&[1, 2, 3, 0][..]));
    assert_eq!(buf.frame(1), Some(&[0, 0, 7, 8][..]));
}

#[test]
fn stats_count_lit_values() {
    let mut buf = FrameBuffer::new(3, 3);
    buf.put_rgb(1, 0, Rgb8::new(10, 0, 5));
    let stats = buf.stats();
    assert_eq!(
        stats,
        SequenceStats {
            frames: 3,
            channels: 3,
            active_frames: 1,
            lit_values: 2,
        }
    );
    assert_eq!(FrameBuffer::new(0, 9).stats().lit_values, 0);
}

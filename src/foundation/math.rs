/// Undo premultiplied alpha in place on tightly packed RGBA8 bytes.
pub(crate) fn unpremultiply_rgba8_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            let v = (u16::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
}

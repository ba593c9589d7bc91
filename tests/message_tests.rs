// Message codec tests: type tag strings, the display form, byte-exact
// encoding, decode round-trips over the full argument set, and address
// pattern matching.

use assert2::check;
use float_cmp::approx_eq;

use osckit::{Argument, Message, OscError, Packet, Timetag};

fn message(address: &str, args: Vec<Argument>) -> Message {
    let mut msg = Message::new(address);
    msg.arguments = args;
    msg
}

#[test]
fn append_accepts_every_supported_type() {
    let mut msg = Message::new("/address");
    msg.append("string argument");
    msg.append(123456789i32);
    msg.append(true);
    check!(msg.arguments.len() == 3);
    check!(msg.type_tags() == ",siT");
}

#[test]
fn type_tags_cover_the_whole_set() {
    let cases: Vec<(Argument, &str)> = vec![
        (Argument::Nil, ",N"),
        (Argument::Bool(true), ",T"),
        (Argument::Bool(false), ",F"),
        (Argument::Int(1), ",i"),
        (Argument::Long(2), ",h"),
        (Argument::Float(3.0), ",f"),
        (Argument::Double(4.0), ",d"),
        (Argument::String("5".to_string()), ",s"),
        (Argument::Blob(vec![b'6']), ",b"),
        (Argument::Time(Timetag::immediate()), ",t"),
    ];
    for (arg, tags) in cases {
        check!(message("/", vec![arg]).type_tags() == tags);
    }
    check!(Message::new("/").type_tags() == ",");
}

#[test]
fn mixed_type_tags() {
    let mut msg = Message::new("/some/address");
    msg.append(100i32);
    msg.append(true);
    msg.append(false);
    check!(msg.type_tags() == ",iTF");
}

#[test]
fn display_renders_address_tags_and_arguments() {
    check!(Message::new("/foo/bar").to_string() == "/foo/bar ,");
    check!(message("/foo/bar", vec![Argument::Nil]).to_string() == "/foo/bar ,N Nil");
    check!(message("/foo/bar", vec!["123".into()]).to_string() == "/foo/bar ,s \"123\"");

    let mut msg = Message::new("/foo/bar");
    msg.append("123");
    msg.append(456i32);
    check!(msg.to_string() == "/foo/bar ,si \"123\" 456");

    let tag = Timetag::from_raw(16818286200017484014);
    check!(
        message("/foo/bar", vec![Argument::Time(tag)]).to_string()
            == "/foo/bar ,t 16818286200017484014"
    );
}

#[test]
fn encodes_a_bare_message_to_eight_bytes() {
    let msg = Message::new("/a/b/c");
    check!(msg.to_bytes() == b"/a/b/c\0\0,\0\0\0".to_vec());
}

#[test]
fn encodes_a_string_argument_with_padding() {
    let msg = message("/d/e/f", vec!["foo".into()]);
    check!(msg.to_bytes() == b"/d/e/f\0\0,s\0\0foo\0".to_vec());
}

#[test]
fn round_trips_every_argument_type() {
    let mut msg = Message::new("/all/types");
    msg.append(1_234_567i32);
    msg.append(-9_000_000_000i64);
    msg.append(3.5f32);
    msg.append(-0.125f64);
    msg.append("hello");
    msg.append(vec![1u8, 2, 3]);
    msg.append(true);
    msg.append(false);
    msg.append(Argument::Nil);
    msg.append(Timetag::from_raw(0x0102_0304_0506_0708));

    let decoded = Packet::decode(&msg.to_bytes()).expect("should decode");
    let Packet::Message(decoded) = decoded else {
        panic!("expected a message");
    };
    check!(decoded == msg);

    check!(decoded.int32(0) == Some(1_234_567));
    check!(decoded.int64(1) == Some(-9_000_000_000));
    check!(approx_eq!(
        f32,
        decoded.float32(2).unwrap(),
        3.5,
        epsilon = f32::EPSILON
    ));
    check!(approx_eq!(
        f64,
        decoded.float64(3).unwrap(),
        -0.125,
        epsilon = f64::EPSILON
    ));
    check!(decoded.string(4) == Some("hello"));
    check!(decoded.blob(5) == Some(&[1u8, 2, 3][..]));
    check!(decoded.bool(6) == Some(true));
    check!(decoded.bool(7) == Some(false));
    check!(decoded.arguments[8] == Argument::Nil);
    check!(decoded.timetag(9) == Some(Timetag::from_raw(0x0102_0304_0506_0708)));

    // Getters check the type, not just the index.
    check!(decoded.int32(1) == None);
    check!(decoded.string(99) == None);
}

#[test]
fn equal_messages_compare_equal() {
    let mut a = Message::new("/address");
    let mut b = Message::new("/address");
    a.append(1234i64);
    b.append(1234i64);
    a.append("test string");
    b.append("test string");
    check!(a == b);

    b.append(Argument::Nil);
    check!(a != b);
}

#[test]
fn decode_tolerates_an_empty_tag_string() {
    // Address "/a", then a padded empty string where the tag string belongs.
    let data = b"/a\0\0\0\0\0\0";
    let packet = Packet::decode(data).expect("empty tag string means no arguments");
    let Packet::Message(msg) = packet else {
        panic!("expected a message");
    };
    check!(msg.address == "/a");
    check!(msg.arguments.is_empty());
}

#[test]
fn decode_rejects_a_tag_string_without_a_comma() {
    let data = b"/a\0\0s\0\0\0";
    let err = Packet::decode(data).unwrap_err();
    check!(matches!(err, OscError::MalformedTypeTags(_)));
}

#[test]
fn decode_rejects_an_unknown_type_tag() {
    let data = b"/a\0\0,x\0\0";
    let err = Packet::decode(data).unwrap_err();
    check!(matches!(err, OscError::UnsupportedTypeTag('x')));
}

#[test]
fn decode_rejects_a_truncated_argument_payload() {
    // The tag string claims an int32 but only two payload bytes follow.
    let data = b"/a\0\0,i\0\0\x00\x01";
    let err = Packet::decode(data).unwrap_err();
    check!(matches!(err, OscError::UnexpectedEof));
}

#[test]
fn sniff_rejects_unknown_leading_bytes() {
    let err = Packet::decode(b"xyz\0").unwrap_err();
    check!(matches!(err, OscError::InvalidPacket));

    let err = Packet::decode(&[]).unwrap_err();
    check!(matches!(err, OscError::UnexpectedEof));
}

#[test]
fn address_patterns_match_literal_addresses() {
    let cases: &[(&str, &str, bool)] = &[
        ("*", "/a/b", true),
        ("/a/b", "/a", false),
        ("/a", "/a/b", false),
        ("/a/{foo,bar}", "/a/foo", true),
        ("/a/{foo,bar}", "/a/bar", true),
        ("/a/{foo,bar}", "/a/baz", false),
        ("/a/?", "/a/b", true),
        ("/a/?", "/a/bc", false),
        ("/message/0[1-3]", "/message/01", true),
        ("/message/0[1-3]", "/message/02", true),
        ("/message/0[1-3]", "/message/03", true),
        ("/message/0[1-3]", "/message/04", false),
        ("/message/0[1-3]", "/message/01/01", false),
    ];
    for (pattern, addr, expected) in cases {
        let msg = Message::new(pattern);
        check!(
            msg.matches(addr).unwrap() == *expected,
            "pattern {:?} against {:?}",
            pattern,
            addr
        );
    }
}

#[test]
fn matching_an_uncompilable_pattern_is_an_error_not_a_panic() {
    let msg = Message::new("}/ ");
    let err = msg.matches("/x").unwrap_err();
    check!(matches!(err, OscError::Pattern { .. }));
}

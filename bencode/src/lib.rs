use std::collections::BTreeMap;
use std::ops::Range;

use thiserror::Error;

use crate::ErrorKind::{
    InputTooLarge, InvalidDictionaryKey, InvalidInteger, InvalidStringLength, LengthExceedsInput,
    NegativeStringLength, NestingTooDeep, TrailingData, UnexpectedByte, UnexpectedEOF,
    UnterminatedDictionary, UnterminatedList,
};

pub type BencodeInt = i64;
pub type BencodeString = Vec<u8>;
pub type BencodeList = Vec<Value>;
pub type Result<T> = std::result::Result<T, BencodeError>;

pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_MAX_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(BencodeInt),
    String(BencodeString),
    List(BencodeList),
    Dict(BencodeDict),
}

static INTEGER_NAME: &str = "integer";
static STRING_NAME: &str = "byte string";
static LIST_NAME: &str = "list";
static DICTIONARY_NAME: &str = "dictionary";

impl Value {
    pub fn name(&self) -> &'static str {
        match self {
            Value::Int(_) => INTEGER_NAME,
            Value::String(_) => STRING_NAME,
            Value::List(_) => LIST_NAME,
            Value::Dict(_) => DICTIONARY_NAME,
        }
    }

    pub fn integer_name() -> &'static str {
        INTEGER_NAME
    }

    pub fn string_name() -> &'static str {
        STRING_NAME
    }

    pub fn list_name() -> &'static str {
        LIST_NAME
    }

    pub fn dictionary_name() -> &'static str {
        DICTIONARY_NAME
    }
}

impl From<BencodeString> for Value {
    fn from(value: BencodeString) -> Self {
        Value::String(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::String(value.to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into_bytes())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.as_bytes().to_vec())
    }
}

impl From<BencodeInt> for Value {
    fn from(value: BencodeInt) -> Self {
        Value::Int(value)
    }
}

impl From<BencodeList> for Value {
    fn from(value: BencodeList) -> Self {
        Value::List(value)
    }
}

impl From<BencodeDict> for Value {
    fn from(value: BencodeDict) -> Self {
        Value::Dict(value)
    }
}

/// One key/value pair of a dictionary.
///
/// `span` is the byte range of the encoded value inside the decoded input. It
/// is only known for entries produced by the decoder.
#[derive(Debug, Clone)]
struct DictEntry {
    key: BencodeString,
    value: Value,
    span: Option<Range<usize>>,
}

impl PartialEq for DictEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

/// Dictionary that keeps its entries in the order they were read or inserted.
///
/// Equality compares keys and values only, so a decoded dictionary equals one
/// built by hand from the same pairs.
#[derive(Debug, Clone, Default)]
pub struct BencodeDict {
    entries: Vec<DictEntry>,
    /// Position of each key in `entries`.
    index: BTreeMap<BencodeString, usize>,
}

impl PartialEq for BencodeDict {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl BencodeDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair, replacing the value of an existing key in place.
    pub fn insert<K: Into<BencodeString>, V: Into<Value>>(&mut self, key: K, value: V) -> &mut Self {
        self.push(key.into(), value.into(), None);
        self
    }

    fn push(&mut self, key: BencodeString, value: Value, span: Option<Range<usize>>) {
        if let Some(entry) = self
            .index
            .get(&key)
            .and_then(|&position| self.entries.get_mut(position))
        {
            entry.value = value;
            entry.span = span;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(DictEntry { key, value, span });
    }

    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entry(key).map(|entry| &entry.value)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entry(key).is_some()
    }

    /// Byte range of the encoded value stored under `key` in the input this
    /// dictionary was decoded from.
    pub fn raw_span(&self, key: &[u8]) -> Option<Range<usize>> {
        self.entry(key).and_then(|entry| entry.span.clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_slice(), &entry.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|entry| entry.key.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, key: &[u8]) -> Option<&DictEntry> {
        self.index
            .get(key)
            .and_then(|&position| self.entries.get(position))
    }
}

impl<K: Into<BencodeString>, V: Into<Value>> FromIterator<(K, V)> for BencodeDict {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = BencodeDict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

impl<K: Into<BencodeString>, V: Into<Value>, const N: usize> From<[(K, V); N]> for BencodeDict {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEOF,
    #[error("invalid integer: {0}")]
    InvalidInteger(&'static str),
    #[error("invalid string length prefix")]
    InvalidStringLength,
    #[error("negative string length prefix")]
    NegativeStringLength,
    #[error("string length {declared} exceeds remaining input of {remaining} bytes")]
    LengthExceedsInput { declared: usize, remaining: usize },
    #[error("unterminated list")]
    UnterminatedList,
    #[error("unterminated dictionary")]
    UnterminatedDictionary,
    #[error("dictionary key must be a byte string, found {0}")]
    InvalidDictionaryKey(&'static str),
    #[error("unexpected byte 0x{0:02x}")]
    UnexpectedByte(u8),
    #[error("trailing data after top-level value")]
    TrailingData,
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("input larger than {0} bytes")]
    InputTooLarge(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at byte {offset}")]
pub struct BencodeError {
    pub offset: usize,
    pub kind: ErrorKind,
}

impl BencodeError {
    pub fn new(offset: usize, kind: ErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// Ceilings applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested lists/dictionaries.
    pub max_depth: usize,
    /// Maximum size of the whole input in bytes.
    pub max_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

pub fn from_slice(data: &[u8]) -> Result<Value> {
    from_slice_with_limits(data, Limits::default())
}

pub fn from_slice_with_limits(data: &[u8], limits: Limits) -> Result<Value> {
    if data.len() > limits.max_len {
        return Err(BencodeError::new(limits.max_len, InputTooLarge(limits.max_len)));
    }
    let mut parser = BencodeDecoder::new(data, limits.max_depth);
    let value = parser.parse()?;
    if parser.pos != data.len() {
        return Err(parser.error(TrailingData));
    }
    Ok(value)
}

struct BencodeDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> BencodeDecoder<'a> {
    fn new(data: &'a [u8], max_depth: usize) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    fn error(&self, kind: ErrorKind) -> BencodeError {
        BencodeError::new(self.pos, kind)
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn parse_str(&mut self) -> Result<BencodeString> {
        if self.peek() == Some(b'-') {
            return Err(self.error(NegativeStringLength));
        }
        let mut len: usize = 0;
        loop {
            match self.peek() {
                Some(b':') => break,
                Some(digit @ b'0'..=b'9') => {
                    len = len
                        .checked_mul(10)
                        .and_then(|len| len.checked_add(usize::from(digit - b'0')))
                        .ok_or_else(|| self.error(InvalidStringLength))?;
                    self.pos += 1;
                }
                Some(_) => return Err(self.error(InvalidStringLength)),
                None => return Err(self.error(UnexpectedEOF)),
            }
        }
        self.pos += 1;
        let remaining = self.data.len() - self.pos;
        if len > remaining {
            return Err(self.error(LengthExceedsInput {
                declared: len,
                remaining,
            }));
        }
        let string = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(string)
    }

    fn parse_int(&mut self) -> Result<BencodeInt> {
        let start = self.pos;
        self.pos += 1;
        let digits_start = self.pos;
        loop {
            match self.peek() {
                Some(b'e') => break,
                Some(b'0'..=b'9') => self.pos += 1,
                Some(b'-') if self.pos == digits_start => self.pos += 1,
                Some(_) => return Err(self.error(InvalidInteger("non-digit character"))),
                None => return Err(self.error(UnexpectedEOF)),
            }
        }
        let literal = &self.data[digits_start..self.pos];
        let invalid = |reason| BencodeError::new(start, InvalidInteger(reason));
        let digits = literal.strip_prefix(b"-").unwrap_or(literal);
        if digits.is_empty() {
            return Err(invalid("no digits"));
        }
        if digits.len() > 1 && digits[0] == b'0' {
            return Err(invalid("leading zero"));
        }
        if literal == b"-0" {
            return Err(invalid("negative zero"));
        }
        // digits and an optional leading '-' are always valid UTF-8
        let int = std::str::from_utf8(literal)
            .ok()
            .and_then(|literal| literal.parse::<BencodeInt>().ok())
            .ok_or_else(|| invalid("out of range"))?;
        self.pos += 1;
        Ok(int)
    }

    fn parse_list(&mut self) -> Result<BencodeList> {
        self.enter()?;
        let mut ans: BencodeList = Vec::new();
        loop {
            match self.peek() {
                Some(b'e') => break,
                Some(_) => ans.push(self.parse()?),
                None => return Err(self.error(UnterminatedList)),
            }
        }
        self.leave();
        Ok(ans)
    }

    fn parse_dict(&mut self) -> Result<BencodeDict> {
        self.enter()?;
        let mut ans = BencodeDict::new();
        loop {
            match self.peek() {
                Some(b'e') => break,
                Some(b'0'..=b'9') => {
                    let key = self.parse_str()?;
                    if self.peek().is_none() {
                        return Err(self.error(UnterminatedDictionary));
                    }
                    let start = self.pos;
                    let value = self.parse()?;
                    ans.push(key, value, Some(start..self.pos));
                }
                Some(_) => {
                    let key_start = self.pos;
                    let found = self.parse()?;
                    return Err(BencodeError::new(
                        key_start,
                        InvalidDictionaryKey(found.name()),
                    ));
                }
                None => return Err(self.error(UnterminatedDictionary)),
            }
        }
        self.leave();
        Ok(ans)
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(self.error(NestingTooDeep(self.max_depth)));
        }
        self.depth += 1;
        self.pos += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
        self.pos += 1;
    }

    fn parse(&mut self) -> Result<Value> {
        match self.peek().ok_or_else(|| self.error(UnexpectedEOF))? {
            b'i' => self.parse_int().map(Value::Int),
            b'l' => self.parse_list().map(Value::List),
            b'd' => self.parse_dict().map(Value::Dict),
            b'0'..=b'9' | b'-' => self.parse_str().map(Value::String),
            byte => Err(self.error(UnexpectedByte(byte))),
        }
    }
}

pub fn into_vec(value: &Value) -> Vec<u8> {
    let mut res = Vec::new();
    let mut encoder = BencodeEncoder::new(&mut res);
    encoder.encode(value);
    res
}

pub struct BencodeEncoder<'a> {
    data: &'a mut Vec<u8>,
}

impl<'a> BencodeEncoder<'a> {
    pub fn new(data: &'a mut Vec<u8>) -> Self {
        Self { data }
    }

    pub fn encode(&mut self, value: &Value) {
        match value {
            Value::Int(int) => self.encode_int(*int),
            Value::String(str) => self.encode_bytes(str.as_slice()),
            Value::List(list) => self.encode_list(list),
            Value::Dict(dict) => self.encode_dict(dict),
        }
    }

    pub fn encode_int(&mut self, int: BencodeInt) {
        self.data.push(b'i');
        self.data.extend_from_slice(int.to_string().as_bytes());
        self.data.push(b'e');
    }

    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        self.data
            .extend_from_slice(bytes.len().to_string().as_bytes());
        self.data.push(b':');
        self.data.extend_from_slice(bytes);
    }

    pub fn encode_list(&mut self, list: &[Value]) {
        self.data.push(b'l');
        for item in list {
            self.encode(item)
        }
        self.data.push(b'e');
    }

    /// Writes entries in stored order; callers wanting canonical output insert
    /// keys in ascending order.
    pub fn encode_dict(&mut self, dict: &BencodeDict) {
        self.data.push(b'd');
        for (key, value) in dict.iter() {
            self.encode_bytes(key);
            self.encode(value);
        }
        self.data.push(b'e');
    }
}

#[cfg(test)]
mod tests {
    use crate::Value::{Dict, Int, List, String};

    use super::*;

    fn decoder(data: &[u8]) -> BencodeDecoder<'_> {
        BencodeDecoder::new(data, DEFAULT_MAX_DEPTH)
    }

    #[test]
    fn parse_valid_string() {
        let data = b"5:aboba";
        let mut parser = decoder(data);
        let str = parser.parse_str();
        assert_eq!(str, Ok(Vec::from("aboba")));
        assert_eq!(parser.pos, data.len());
    }

    #[test]
    fn parse_zero_string() {
        let data = b"0:";
        let mut parser = decoder(data);
        let str = parser.parse_str();
        assert_eq!(str, Ok(Vec::from("")));
        assert_eq!(parser.pos, data.len());
    }

    #[test]
    fn parse_binary_string() {
        let data = b"3:\xff\x00\xfe";
        assert_eq!(from_slice(data), Ok(String(vec![0xff, 0x00, 0xfe])));
    }

    #[test]
    fn parse_string_longer_than_input() {
        let data = b"5:abfd";
        let mut parser = decoder(data);
        let str = parser.parse_str();
        assert_eq!(
            str,
            Err(BencodeError::new(
                2,
                LengthExceedsInput {
                    declared: 5,
                    remaining: 4
                }
            ))
        );
    }

    #[test]
    fn parse_string_with_non_digit_length() {
        assert_eq!(
            from_slice(b"3x:abc"),
            Err(BencodeError::new(1, InvalidStringLength))
        );
    }

    #[test]
    fn parse_string_with_negative_length() {
        assert_eq!(
            from_slice(b"-3:abc"),
            Err(BencodeError::new(0, NegativeStringLength))
        );
    }

    #[test]
    fn parse_string_without_colon() {
        assert_eq!(from_slice(b"12"), Err(BencodeError::new(2, UnexpectedEOF)));
    }

    #[test]
    fn parse_valid_int() {
        let data = b"i452e";
        let mut parser = decoder(data);
        let int = parser.parse_int();
        assert_eq!(int, Ok(452));
        assert_eq!(parser.pos, data.len());
    }

    #[test]
    fn parse_negative_and_zero_int() {
        assert_eq!(from_slice(b"i-42e"), Ok(Int(-42)));
        assert_eq!(from_slice(b"i0e"), Ok(Int(0)));
        assert_eq!(from_slice(b"i-9223372036854775808e"), Ok(Int(i64::MIN)));
    }

    #[test]
    fn parse_invalid_int() {
        let data = b"i4f52e";
        let mut parser = decoder(data);
        let int = parser.parse_int();
        assert_eq!(
            int,
            Err(BencodeError::new(2, InvalidInteger("non-digit character")))
        );
    }

    #[test]
    fn parse_int_with_leading_zero() {
        assert_eq!(
            from_slice(b"i03e"),
            Err(BencodeError::new(0, InvalidInteger("leading zero")))
        );
        assert_eq!(
            from_slice(b"i-03e"),
            Err(BencodeError::new(0, InvalidInteger("leading zero")))
        );
    }

    #[test]
    fn parse_negative_zero_int() {
        assert_eq!(
            from_slice(b"i-0e"),
            Err(BencodeError::new(0, InvalidInteger("negative zero")))
        );
    }

    #[test]
    fn parse_empty_int() {
        assert_eq!(
            from_slice(b"ie"),
            Err(BencodeError::new(0, InvalidInteger("no digits")))
        );
        assert_eq!(
            from_slice(b"i-e"),
            Err(BencodeError::new(0, InvalidInteger("no digits")))
        );
    }

    #[test]
    fn parse_int_out_of_range() {
        assert_eq!(
            from_slice(b"i9223372036854775808e"),
            Err(BencodeError::new(0, InvalidInteger("out of range")))
        );
    }

    #[test]
    fn parse_invalid_int_without_ending_e() {
        let data = b"i452";
        let mut parser = decoder(data);
        let int = parser.parse_int();
        assert_eq!(int, Err(BencodeError::new(4, UnexpectedEOF)));
    }

    #[test]
    fn parse_valid_list() {
        let data = Vec::from(b"l4:spami42ee");
        let mut parser = decoder(data.as_slice());
        let list = parser.parse_list();
        assert_eq!(
            list,
            Ok(vec![Value::String(Vec::from(b"spam")), Value::Int(42)])
        );
        assert_eq!(parser.pos, data.len());
    }

    #[test]
    fn parse_invalid_list_without_ending_e() {
        let data = Vec::from(b"l4:spami42e");
        let list = from_slice(data.as_slice());
        assert_eq!(list, Err(BencodeError::new(11, UnterminatedList)));
    }

    #[test]
    fn parse_nested_list_without_ending_e_reports_end_of_last_element() {
        let data = b"ll1:aei7e";
        assert_eq!(from_slice(data), Err(BencodeError::new(9, UnterminatedList)));
    }

    #[test]
    fn parse_invalid_list_with_incorrect_element() {
        let data = Vec::from(b"l4:spamuperi42ee");
        let list = from_slice(data.as_slice());

        assert_eq!(list, Err(BencodeError::new(7, UnexpectedByte(b'u'))));
    }

    #[test]
    fn parse_list_of_nested_containers() {
        let data = b"lli43e5:abobaed3:bari52eee";
        let list = from_slice(data);
        let map = BencodeDict::from([("bar", Int(52))]);
        assert_eq!(
            list,
            Ok(List(vec![
                List(vec![Int(43), String(b"aboba".to_vec())]),
                Dict(map)
            ]))
        );
    }

    #[test]
    fn parse_valid_dict() {
        let data = Vec::from(b"d3:bar4:spam3:fooi42ee");
        let mut parser = decoder(data.as_slice());
        let map_dict = BencodeDict::from([
            ("bar", String(b"spam".to_vec())),
            ("foo", Int(42)),
        ]);
        let dict = parser.parse_dict();
        assert_eq!(dict, Ok(map_dict));
        assert_eq!(parser.pos, data.len());
    }

    #[test]
    fn parse_dict_keeps_input_order() {
        let value = from_slice(b"d3:zzzi1e3:aaai2ee").unwrap();
        let Dict(dict) = value else {
            panic!("expected dictionary");
        };
        let keys: Vec<&[u8]> = dict.keys().collect();
        assert_eq!(keys, vec![b"zzz".as_slice(), b"aaa".as_slice()]);
    }

    #[test]
    fn parse_dict_records_value_spans() {
        let data = b"d8:announce3:url4:infod6:lengthi1eee";
        let Dict(dict) = from_slice(data).unwrap() else {
            panic!("expected dictionary");
        };
        let span = dict.raw_span(b"info").unwrap();
        assert_eq!(&data[span], b"d6:lengthi1ee".as_slice());
        let span = dict.raw_span(b"announce").unwrap();
        assert_eq!(&data[span], b"3:url".as_slice());
        assert_eq!(dict.raw_span(b"missing"), None);
    }

    #[test]
    fn hand_built_dict_has_no_span() {
        let dict = BencodeDict::from([("info", Int(1))]);
        assert_eq!(dict.raw_span(b"info"), None);
        assert!(dict.contains_key(b"info"));
    }

    #[test]
    fn parse_wide_dict_without_quadratic_cost() {
        let count = 100_000;
        let mut data = b"d".to_vec();
        for key in 0..count {
            data.extend_from_slice(format!("8:{key:08}i0e").as_bytes());
        }
        data.push(b'e');

        let started = std::time::Instant::now();
        let Ok(Dict(dict)) = from_slice(&data) else {
            panic!("expected a dictionary");
        };
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
        assert_eq!(dict.len(), count);
        assert_eq!(dict.get(b"00099999"), Some(&Int(0)));
        assert_eq!(dict.raw_span(b"00000000"), Some(11..14));
    }

    #[test]
    fn duplicate_key_keeps_first_position() {
        let dict = from_slice(b"d1:ai1e1:bi2e1:ai3ee").unwrap();
        let Dict(dict) = dict else {
            panic!("expected a dictionary");
        };
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec![b"a".as_slice(), b"b"]);
        assert_eq!(dict.get(b"a"), Some(&Int(3)));
        assert_eq!(dict.raw_span(b"a"), Some(16..19));
    }

    #[test]
    fn parse_invalid_dict_without_ending_e() {
        let data = Vec::from(b"d3:bar4:spam3:fooi42e");
        let dict = from_slice(data.as_slice());
        assert_eq!(dict, Err(BencodeError::new(21, UnterminatedDictionary)));
    }

    #[test]
    fn parse_dict_with_missing_value() {
        assert_eq!(
            from_slice(b"d3:bar"),
            Err(BencodeError::new(6, UnterminatedDictionary))
        );
    }

    #[test]
    fn parse_dict_with_integer_key() {
        assert_eq!(
            from_slice(b"di1e3:bare"),
            Err(BencodeError::new(1, InvalidDictionaryKey("integer")))
        );
    }

    #[test]
    fn parse_trailing_data() {
        assert_eq!(from_slice(b"i1ei2e"), Err(BencodeError::new(3, TrailingData)));
    }

    #[test]
    fn parse_empty_input() {
        assert_eq!(from_slice(b""), Err(BencodeError::new(0, UnexpectedEOF)));
    }

    #[test]
    fn parse_too_deep() {
        let limits = Limits {
            max_depth: 3,
            ..Limits::default()
        };
        assert_eq!(
            from_slice_with_limits(b"llleee", limits),
            Ok(List(vec![List(vec![List(vec![])])]))
        );
        assert_eq!(
            from_slice_with_limits(b"lllleeee", limits),
            Err(BencodeError::new(3, NestingTooDeep(3)))
        );
    }

    #[test]
    fn parse_adversarial_nesting_does_not_overflow_stack() {
        let mut data = vec![b'l'; 100_000];
        data.extend(vec![b'e'; 100_000]);
        assert_eq!(
            from_slice(&data),
            Err(BencodeError::new(
                DEFAULT_MAX_DEPTH,
                NestingTooDeep(DEFAULT_MAX_DEPTH)
            ))
        );
    }

    #[test]
    fn parse_too_large() {
        let limits = Limits {
            max_len: 4,
            ..Limits::default()
        };
        assert_eq!(
            from_slice_with_limits(b"5:aboba", limits),
            Err(BencodeError::new(4, InputTooLarge(4)))
        );
    }

    #[test]
    fn error_message_contains_offset() {
        let err = from_slice(b"l4:spami42e").unwrap_err();
        assert_eq!(err.to_string(), "unterminated list at byte 11");
    }

    #[test]
    fn encode_string() {
        let mut vec = Vec::new();
        let mut encoder = BencodeEncoder::new(&mut vec);
        encoder.encode(&String(b"aboba".to_vec()));
        assert_eq!(vec.as_slice(), b"5:aboba");
    }

    #[test]
    fn encode_int_negative() {
        let mut vec = Vec::new();
        let mut encoder = BencodeEncoder::new(&mut vec);
        encoder.encode(&Int(-354));
        assert_eq!(vec.as_slice(), b"i-354e");
    }

    #[test]
    fn encode_int_zero() {
        let mut vec = Vec::new();
        let mut encoder = BencodeEncoder::new(&mut vec);
        encoder.encode(&Int(0));
        assert_eq!(vec.as_slice(), b"i0e");
    }

    #[test]
    fn encode_list() {
        let mut vec = Vec::new();
        let mut encoder = BencodeEncoder::new(&mut vec);
        encoder.encode(&List(vec![345i64.into()]));
        assert_eq!(vec.as_slice(), b"li345ee");
    }

    #[test]
    fn encode_dict() {
        let mut map = BencodeDict::new();
        map.insert("first", 3546i64).insert("second", "go here dgf");
        assert_eq!(
            crate::into_vec(&Dict(map)).as_slice(),
            b"d5:firsti3546e6:second11:go here dgfe"
        );
    }

    #[test]
    fn round_trip_reproduces_canonical_input() {
        let inputs: [&[u8]; 4] = [
            b"d8:announce17:http://t/announce4:infod6:lengthi100e4:name5:a.txt12:piece lengthi16384eee",
            b"lli43e5:abobaed3:bari52eee",
            b"d4:listl0:i-7ed0:leeee",
            b"le",
        ];
        for input in inputs {
            let value = from_slice(input).unwrap();
            assert_eq!(into_vec(&value), input);
        }
    }
}

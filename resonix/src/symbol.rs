use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub code: String,
    pub name: String,
}

impl Instrument {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
        }
    }

    pub fn with_name(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// 关注的标的列表。配置里既可以写成代码数组，也可以写成 `代码 -> 名称` 映射。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InstrumentListRepr")]
pub struct InstrumentList(Vec<Instrument>);

#[derive(Deserialize)]
#[serde(untagged)]
enum InstrumentListRepr {
    Codes(Vec<String>),
    Named(BTreeMap<String, String>),
    Full(Vec<Instrument>),
}

impl From<InstrumentListRepr> for InstrumentList {
    fn from(value: InstrumentListRepr) -> Self {
        let items = match value {
            InstrumentListRepr::Codes(codes) => codes.into_iter().map(Instrument::new).collect(),
            InstrumentListRepr::Named(named) => named
                .into_iter()
                .map(|(code, name)| Instrument::with_name(code, name))
                .collect(),
            InstrumentListRepr::Full(items) => items,
        };
        Self::new(items)
    }
}

impl InstrumentList {
    pub fn new(items: Vec<Instrument>) -> Self {
        let mut deduped: Vec<Instrument> = Vec::with_capacity(items.len());
        for item in items {
            let code = item.code.trim();
            if code.is_empty() || deduped.iter().any(|x| x.code == code) {
                continue;
            }
            deduped.push(Instrument {
                code: code.to_string(),
                name: item.name,
            });
        }
        Self(deduped)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.0.iter()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(|x| x.code.as_str()).collect()
    }

    pub fn get(&self, code: &str) -> Option<&Instrument> {
        self.0.iter().find(|x| x.code == code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

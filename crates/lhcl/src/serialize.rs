//! serde representation of the syntax tree
//!
//! Every node serializes as a map with the attribute view of [Node]:
//! - `kind`: the [crate::Kind] name, for example `string_property`
//! - `name`: only present when the node has a name
//! - `value`: only present when the node has a value
//! - `children`: only present for container kinds, empty containers give `[]`
//!
//! There is no deserialization, the tree is always built by the parser.
use crate::node::{Document, Node};
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};

struct Children<'a>(&'a [Node]);

impl serde::ser::Serialize for Children<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for child in self.0 {
            ser.serialize_element(child)?;
        }
        ser.end()
    }
}

impl serde::ser::Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let name = self.name();
        let value = self.value();
        let children = self.children();

        let len = 1
            + usize::from(name.is_some())
            + usize::from(value.is_some())
            + usize::from(children.is_some());
        let mut ser = serializer.serialize_map(Some(len))?;
        ser.serialize_entry("kind", &self.kind().to_string())?;
        if let Some(name) = name {
            ser.serialize_entry("name", name)?;
        }
        if let Some(value) = value.as_deref() {
            ser.serialize_entry("value", value)?;
        }
        if let Some(children) = children {
            ser.serialize_entry("children", &Children(children))?;
        }
        ser.end()
    }
}

impl serde::ser::Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde::ser::Serialize::serialize(self.root(), serializer)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    #[test]
    fn json_shape() {
        let document =
            crate::parse("module vpc {\n  cidr = \"10.0.0.0/16\"\n  azs = []\n}").unwrap();

        assert_eq!(
            serde_json::to_value(&document).unwrap(),
            serde_json::json!({
                "kind": "root",
                "children": [{
                    "kind": "block",
                    "name": "module",
                    "value": "vpc",
                    "children": [
                        {
                            "kind": "string_property",
                            "name": "cidr",
                            "children": [{"kind": "string", "value": "10.0.0.0/16"}]
                        },
                        {"kind": "list_property", "name": "azs", "children": []}
                    ]
                }]
            })
        );
    }
}

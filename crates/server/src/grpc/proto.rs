//! Messages of `proto/shop.proto`; tags must stay in sync with that file.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListReq {
    #[prost(int64, tag = "1")]
    pub shop_id: i64,
    #[prost(string, tag = "2")]
    pub shop_name: String,
    #[prost(int64, repeated, tag = "3")]
    pub shop_ids: Vec<i64>,
    #[prost(string, repeated, tag = "4")]
    pub field_list: Vec<String>,
    #[prost(int64, tag = "5")]
    pub page_no: i64,
    #[prost(int64, tag = "6")]
    pub page_size: i64,
    #[prost(string, tag = "7")]
    pub sort_by: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShopData {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub desc: String,
    #[prost(int64, tag = "4")]
    pub count: i64,
    #[prost(int64, tag = "5")]
    pub create_time: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListResp {
    #[prost(message, repeated, tag = "1")]
    pub data: Vec<ShopData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IncrReq {
    #[prost(int64, tag = "1")]
    pub shop_id: i64,
    #[prost(int64, tag = "2")]
    pub n: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IncrResp {
    #[prost(bool, tag = "1")]
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn list_req_uses_declared_tags() {
        let req = ListReq { shop_id: 1, sort_by: "create_time-".into(), ..Default::default() };
        let bytes = req.encode_to_vec();
        // field 1 varint, field 7 length-delimited
        assert_eq!(bytes[0], 0x08);
        assert_eq!(bytes[2], 0x3a);
    }
}

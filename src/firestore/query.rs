use firestore_grpc::v1::{
    structured_query::{
        field_filter::Operator as FieldFilterOperator, filter::FilterType as GrpcFilterType,
        CollectionSelector, FieldFilter as GrpcFieldFilter, FieldReference, Filter as GrpcFilter,
    },
    StructuredQuery,
};

use crate::store::FieldValue;

use super::encode::to_value;

/// A single `field == value` condition.
pub(crate) struct EqualTo {
    field: String,
    value: FieldValue,
}

impl EqualTo {
    pub(crate) fn new(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    fn into_grpc_filter(self) -> GrpcFilter {
        GrpcFilter {
            filter_type: Some(GrpcFilterType::FieldFilter(GrpcFieldFilter {
                field: Some(FieldReference {
                    field_path: self.field,
                }),
                op: FieldFilterOperator::Equal as i32,
                value: Some(to_value(&self.value)),
            })),
        }
    }
}

/// Query over the direct children of one collection.
pub(crate) fn structured_query(collection_id: &str, filter: EqualTo) -> StructuredQuery {
    StructuredQuery {
        select: None,
        from: vec![CollectionSelector {
            collection_id: collection_id.to_string(),
            all_descendants: false,
        }],
        r#where: Some(filter.into_grpc_filter()),
        order_by: vec![],
        start_at: None,
        end_at: None,
        offset: 0,
        limit: None,
    }
}

pub mod bundle;
pub mod collection;
pub mod component;
pub mod custom_accessory;
pub mod order;
pub mod product;

use sea_orm::{ConnectionTrait, DatabaseConnection, Schema};

use crate::entities::{
    bundle::Entity as Bundle,
    collection::Entity as Collection,
    component::Entity as Component,
    custom_accessory::Entity as CustomAccessory,
    order::Entity as Order,
    product::Entity as Product,
};

pub async fn setup_schema(db: &DatabaseConnection) {
    let schema = Schema::new(db.get_database_backend());
    let create_product_table = schema.create_table_from_entity(Product);
    let create_bundle_table = schema.create_table_from_entity(Bundle);
    let create_collection_table = schema.create_table_from_entity(Collection);
    let create_component_table = schema.create_table_from_entity(Component);
    let create_custom_table = schema.create_table_from_entity(CustomAccessory);
    let create_order_table = schema.create_table_from_entity(Order);

    db.execute(db.get_database_backend().build(&create_product_table))
        .await
        .expect("Failed to create product schema");
    db.execute(db.get_database_backend().build(&create_bundle_table))
        .await
        .expect("Failed to create bundle schema");
    db.execute(db.get_database_backend().build(&create_collection_table))
        .await
        .expect("Failed to create collection schema");
    db.execute(db.get_database_backend().build(&create_component_table))
        .await
        .expect("Failed to create component schema");
    db.execute(db.get_database_backend().build(&create_custom_table))
        .await
        .expect("Failed to create custom accessory schema");
    db.execute(db.get_database_backend().build(&create_order_table))
        .await
        .expect("Failed to create order schema");
}

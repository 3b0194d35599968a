// `HtmlCollection` and `NodeList` cannot implement `IntoIterator`: both the trait and the types
// are foreign.

use wasm_bindgen::JsCast;


macro_rules! impl_collection_iterator {
    ($iterator:ident, $collection:ty, $item:ty) => {
        pub struct $iterator {
            collection: $collection,
            index: u32,
        }

        impl From<$collection> for $iterator {
            fn from(collection: $collection) -> Self { Self { collection, index: 0 } }
        }

        impl Iterator for $iterator {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                let item = self.collection.item(self.index);
                self.index += 1;
                item
            }
        }
    };
}

impl_collection_iterator!(HtmlCollectionIterator, web_sys::HtmlCollection, web_sys::Element);
impl_collection_iterator!(NodeListIterator, web_sys::NodeList, web_sys::Node);

impl NodeListIterator {
    // Selector results are elements; anything else (there should be nothing else) is skipped.
    pub fn elements<T: JsCast>(self) -> impl Iterator<Item = T> {
        self.filter_map(|node| node.dyn_into::<T>().ok())
    }
}
